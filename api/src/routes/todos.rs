//! Todo CRUD endpoints.
//!
//! Each handler reports what it did through the request-scoped logger:
//! store access as database operations, creation and deletion as business
//! events, and store failures as application errors.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use shared::logging::{DbOperation, StructuredLogger};
use shared::models::{NewTodo, Todo, TodoPatch};
use shared::storage::TodoStoreError;

use super::{api_error, ApiFailure};
use crate::context::RequestLogger;
use crate::state::AppState;

const TABLE: &str = "todos";

type TodoResult<T> = Result<(StatusCode, Json<T>), ApiFailure>;

/// Response for a successful delete.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    /// Confirmation message.
    pub message: String,
}

/// Creates the todo routes.
pub fn todos_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/todos", get(list_todos).post(create_todo))
        .route(
            "/api/todos/{id}",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
        .with_state(state)
}

async fn list_todos(State(state): State<AppState>, logger: RequestLogger) -> TodoResult<Vec<Todo>> {
    match state.todo_store().list() {
        Ok(todos) => {
            logger
                .log_database_operation(DbOperation::Select, TABLE, true, None, None)
                .await;
            Ok((StatusCode::OK, Json(todos)))
        }
        Err(e) => Err(store_failure(&logger, DbOperation::Select, "list_todos", e).await),
    }
}

async fn get_todo(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    logger: RequestLogger,
) -> TodoResult<Todo> {
    match state.todo_store().get(id) {
        Ok(todo) => {
            logger
                .log_database_operation(DbOperation::Select, TABLE, true, None, None)
                .await;
            Ok((StatusCode::OK, Json(todo)))
        }
        Err(e) => Err(store_failure(&logger, DbOperation::Select, "get_todo", e).await),
    }
}

/// Creates a todo.
///
/// The body must be a JSON object with a `title`; `description` and
/// `completed` are optional. Rejected bodies are reported as a
/// `todo_creation_failed` business event with the reason.
async fn create_todo(
    State(state): State<AppState>,
    logger: RequestLogger,
    payload: Result<Json<Value>, JsonRejection>,
) -> TodoResult<Todo> {
    let data = match payload {
        Ok(Json(data)) => data,
        Err(rejection) => {
            let message = rejection.body_text();
            creation_failed(&logger, json!({"reason": "invalid_json", "detail": message})).await;
            return Err(api_error(StatusCode::BAD_REQUEST, "invalid_json", message));
        }
    };

    if data.get("title").is_none() {
        creation_failed(
            &logger,
            json!({"reason": "missing_title", "request_data": data}),
        )
        .await;
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "missing_title",
            "Title is required",
        ));
    }

    let new_todo: NewTodo = match serde_json::from_value(data) {
        Ok(new_todo) => new_todo,
        Err(e) => {
            let message = e.to_string();
            creation_failed(&logger, json!({"reason": "invalid_payload", "detail": message})).await;
            return Err(api_error(StatusCode::BAD_REQUEST, "invalid_payload", message));
        }
    };

    match state.todo_store().create(new_todo) {
        Ok(todo) => {
            logger
                .log_business_event(
                    "todo_created",
                    Some(json!({
                        "todo_id": todo.id,
                        "title": todo.title,
                        "completed": todo.completed,
                    })),
                    None,
                )
                .await;
            logger
                .log_database_operation(DbOperation::Insert, TABLE, true, None, None)
                .await;
            Ok((StatusCode::CREATED, Json(todo)))
        }
        Err(TodoStoreError::Invalid(e)) => {
            let message = e.to_string();
            creation_failed(&logger, json!({"reason": "validation_failed", "detail": message}))
                .await;
            Err(api_error(StatusCode::BAD_REQUEST, "validation_error", message))
        }
        Err(e) => Err(store_failure(&logger, DbOperation::Insert, "create_todo", e).await),
    }
}

/// Applies a partial update. An empty body is rejected.
async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    logger: RequestLogger,
    payload: Result<Json<Value>, JsonRejection>,
) -> TodoResult<Todo> {
    let Json(data) = payload.map_err(|rejection| {
        api_error(
            StatusCode::BAD_REQUEST,
            "invalid_json",
            rejection.body_text(),
        )
    })?;

    let patch = match data {
        Value::Object(map) if !map.is_empty() => {
            serde_json::from_value::<TodoPatch>(Value::Object(map)).map_err(|e| {
                api_error(StatusCode::BAD_REQUEST, "invalid_payload", e.to_string())
            })?
        }
        _ => TodoPatch::default(),
    };

    if patch.is_empty() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "no_data",
            "No data provided",
        ));
    }

    match state.todo_store().update(id, patch) {
        Ok(todo) => {
            logger
                .log_database_operation(DbOperation::Update, TABLE, true, None, None)
                .await;
            Ok((StatusCode::OK, Json(todo)))
        }
        Err(e) => Err(store_failure(&logger, DbOperation::Update, "update_todo", e).await),
    }
}

async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    logger: RequestLogger,
) -> TodoResult<DeleteResponse> {
    match state.todo_store().delete(id) {
        Ok(todo) => {
            logger
                .log_database_operation(DbOperation::Delete, TABLE, true, None, None)
                .await;
            logger
                .log_business_event("todo_deleted", Some(json!({"todo_id": todo.id})), None)
                .await;
            Ok((
                StatusCode::OK,
                Json(DeleteResponse {
                    message: "Todo deleted successfully".to_string(),
                }),
            ))
        }
        Err(e) => Err(store_failure(&logger, DbOperation::Delete, "delete_todo", e).await),
    }
}

async fn creation_failed(logger: &StructuredLogger, data: Value) {
    logger
        .log_business_event("todo_creation_failed", Some(data), None)
        .await;
}

/// Maps a store error to a response.
///
/// Missing todos are 404 and invalid input is 400. Anything else is a
/// storage failure: it is logged as a `database_error` application error
/// plus a failed database operation, and answered with 500.
async fn store_failure(
    logger: &StructuredLogger,
    operation: DbOperation,
    action: &str,
    error: TodoStoreError,
) -> ApiFailure {
    match error {
        TodoStoreError::NotFound(id) => api_error(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("Todo {id} not found"),
        ),
        TodoStoreError::Invalid(e) => {
            api_error(StatusCode::BAD_REQUEST, "validation_error", e.to_string())
        }
        other => {
            let message = other.to_string();
            logger
                .log_error(
                    "database_error",
                    &message,
                    None,
                    Some(json!({"operation": action})),
                    None,
                )
                .await;
            logger
                .log_database_operation(operation, TABLE, false, Some(&message), None)
                .await;
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "database_error",
                format!("Failed to {}", action.replace('_', " ")),
            )
        }
    }
}
