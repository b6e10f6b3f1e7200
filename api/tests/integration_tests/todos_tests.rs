//! Integration tests for the todo endpoints.
//!
//! Tests cover:
//! - CRUD round trip through the router
//! - Id assignment
//! - Business events and database operations emitted by each handler
//! - Storage failures

use axum::http::StatusCode;
use serde_json::json;
use shared::collector::CollectorConfig;
use std::sync::Arc;

use super::common::{
    delete, get, post_json, put_json, records_of, test_app, test_app_with, FailingStore,
};

#[tokio::test]
async fn test_todo_lifecycle() {
    let app = test_app();

    let (status, created) = post_json(
        app.router.clone(),
        "/api/todos",
        json!({"title": "Write report", "description": "Q3 numbers"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], 1);
    assert_eq!(created["completed"], false);
    assert!(created["created_at"].is_string());

    let (status, updated) = put_json(
        app.router.clone(),
        "/api/todos/1",
        json!({"completed": true}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["completed"], true);
    assert_eq!(updated["title"], "Write report");
    assert_eq!(updated["description"], "Q3 numbers");

    let (status, list) = get(app.router.clone(), "/api/todos").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, body) = delete(app.router.clone(), "/api/todos/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Todo deleted successfully");

    let (status, _) = get(app.router, "/api/todos/1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_ids_are_not_reused_after_delete() {
    let app = test_app();

    post_json(app.router.clone(), "/api/todos", json!({"title": "a"})).await;
    post_json(app.router.clone(), "/api/todos", json!({"title": "b"})).await;
    delete(app.router.clone(), "/api/todos/2").await;

    let (_, created) = post_json(app.router, "/api/todos", json!({"title": "c"})).await;
    assert_eq!(created["id"], 3);
}

#[tokio::test]
async fn test_create_emits_business_event_and_insert() {
    let app = test_app();

    post_json(
        app.router,
        "/api/todos",
        json!({"title": "Buy milk", "completed": true}),
    )
    .await;

    let business = records_of(&app.sink, "business_event");
    assert_eq!(business.len(), 1);
    assert_eq!(business[0]["message"], "Business event: todo_created");
    assert_eq!(business[0]["fields"]["business_event_type"], "todo_created");
    assert_eq!(business[0]["fields"]["todo_id"], 1);
    assert_eq!(business[0]["fields"]["title"], "Buy milk");
    assert_eq!(business[0]["fields"]["completed"], true);

    let db = records_of(&app.sink, "database_operation");
    assert_eq!(db.len(), 1);
    assert_eq!(db[0]["message"], "Database INSERT on todos: SUCCESS");
    assert_eq!(db[0]["level"], "INFO");
}

#[tokio::test]
async fn test_missing_title_is_reported() {
    let app = test_app();

    let (status, body) = post_json(
        app.router,
        "/api/todos",
        json!({"description": "no title"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Title is required");

    let business = records_of(&app.sink, "business_event");
    assert_eq!(business.len(), 1);
    assert_eq!(
        business[0]["fields"]["business_event_type"],
        "todo_creation_failed"
    );
    assert_eq!(business[0]["fields"]["reason"], "missing_title");
    assert_eq!(
        business[0]["fields"]["request_data"]["description"],
        "no title"
    );
    assert!(records_of(&app.sink, "database_operation").is_empty());
}

#[tokio::test]
async fn test_title_too_long_is_rejected() {
    let app = test_app();

    let (status, body) = post_json(
        app.router.clone(),
        "/api/todos",
        json!({"title": "x".repeat(101)}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let (_, list) = get(app.router, "/api/todos").await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_update_with_empty_body_is_rejected() {
    let app = test_app();
    post_json(app.router.clone(), "/api/todos", json!({"title": "a"})).await;

    let (status, body) = put_json(app.router, "/api/todos/1", json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No data provided");
}

#[tokio::test]
async fn test_update_and_delete_emit_database_operations() {
    let app = test_app();
    post_json(app.router.clone(), "/api/todos", json!({"title": "a"})).await;
    put_json(app.router.clone(), "/api/todos/1", json!({"title": "b"})).await;
    delete(app.router, "/api/todos/1").await;

    let operations: Vec<String> = records_of(&app.sink, "database_operation")
        .iter()
        .map(|r| r["fields"]["operation"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(operations, vec!["INSERT", "UPDATE", "DELETE"]);

    let deleted = records_of(&app.sink, "business_event")
        .into_iter()
        .find(|r| r["fields"]["business_event_type"] == "todo_deleted")
        .unwrap();
    assert_eq!(deleted["fields"]["todo_id"], 1);
}

#[tokio::test]
async fn test_storage_failure_logs_database_error() {
    let app = test_app_with(
        Arc::new(FailingStore),
        CollectorConfig::default(),
        api::metrics::detached_handle(),
    );

    let (status, body) = post_json(app.router, "/api/todos", json!({"title": "a"})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Failed to create todo");

    let errors = records_of(&app.sink, "application_error");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["level"], "ERROR");
    assert_eq!(errors[0]["fields"]["error_type"], "database_error");
    assert_eq!(errors[0]["fields"]["context"]["operation"], "create_todo");

    let db = records_of(&app.sink, "database_operation");
    assert_eq!(db.len(), 1);
    assert_eq!(db[0]["fields"]["success"], false);
    assert_eq!(db[0]["level"], "ERROR");
    assert_eq!(db[0]["message"], "Database INSERT on todos: FAILED");
}

#[tokio::test]
async fn test_storage_failure_on_list() {
    let app = test_app_with(
        Arc::new(FailingStore),
        CollectorConfig::default(),
        api::metrics::detached_handle(),
    );

    let (status, body) = get(app.router, "/api/todos").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "database_error");
}
