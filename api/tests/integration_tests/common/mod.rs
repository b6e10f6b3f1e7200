//! Common test utilities and helpers for integration tests.
//!
//! This module provides shared functionality used across all integration tests,
//! including test app setup and HTTP request helpers.

use api::{create_router, AppState};
use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::Value;
use shared::collector::CollectorConfig;
use shared::logging::MemorySink;
use shared::models::{NewTodo, Todo, TodoPatch};
use shared::storage::{InMemoryTodoStore, TodoStore, TodoStoreError};
use std::sync::Arc;

/// A router whose console output is captured.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub sink: MemorySink,
}

/// Creates a test app with a fresh in-memory store and no collector.
pub fn test_app() -> TestApp {
    test_app_with(
        Arc::new(InMemoryTodoStore::new()),
        CollectorConfig::default(),
        api::metrics::detached_handle(),
    )
}

/// Creates a test app exporting to the collector at `url`.
pub fn test_app_with_collector(url: &str) -> TestApp {
    test_app_with(
        Arc::new(InMemoryTodoStore::new()),
        CollectorConfig::new(url, "test-token"),
        api::metrics::detached_handle(),
    )
}

/// Creates a test app from explicit parts.
pub fn test_app_with(
    store: Arc<dyn TodoStore>,
    collector: CollectorConfig,
    metrics_handle: PrometheusHandle,
) -> TestApp {
    let sink = MemorySink::new();
    let state = AppState::new(store, Arc::new(sink.clone()), collector, metrics_handle);
    let router = create_router(state.clone());
    TestApp {
        router,
        state,
        sink,
    }
}

/// A store whose every operation fails with a storage error.
pub struct FailingStore;

impl TodoStore for FailingStore {
    fn list(&self) -> Result<Vec<Todo>, TodoStoreError> {
        Err(unavailable())
    }

    fn get(&self, _id: u64) -> Result<Todo, TodoStoreError> {
        Err(unavailable())
    }

    fn create(&self, _new: NewTodo) -> Result<Todo, TodoStoreError> {
        Err(unavailable())
    }

    fn update(&self, _id: u64, _patch: TodoPatch) -> Result<Todo, TodoStoreError> {
        Err(unavailable())
    }

    fn delete(&self, _id: u64) -> Result<Todo, TodoStoreError> {
        Err(unavailable())
    }

    fn count(&self) -> Result<usize, TodoStoreError> {
        Err(unavailable())
    }
}

fn unavailable() -> TodoStoreError {
    TodoStoreError::StorageError("connection refused".to_string())
}

/// Sends a request and returns the raw response.
pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    tower::ServiceExt::oneshot(app, request).await.unwrap()
}

async fn into_json(response: Response<Body>) -> (StatusCode, Value) {
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn with_json(app: Router, method: &str, uri: &str, body: &Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap();
    into_json(send(app, request).await).await
}

async fn without_body(app: Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    into_json(send(app, request).await).await
}

/// Helper to make a POST request with JSON body.
pub async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    with_json(app, "POST", uri, &body).await
}

/// Helper to make a PUT request with JSON body.
pub async fn put_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    with_json(app, "PUT", uri, &body).await
}

/// Helper to make a POST request without a body.
pub async fn post_empty(app: Router, uri: &str) -> (StatusCode, Value) {
    without_body(app, "POST", uri).await
}

/// Helper to make a GET request.
pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    without_body(app, "GET", uri).await
}

/// Helper to make a DELETE request.
pub async fn delete(app: Router, uri: &str) -> (StatusCode, Value) {
    without_body(app, "DELETE", uri).await
}

/// Returns the captured records of the given event type.
pub fn records_of(sink: &MemorySink, event_type: &str) -> Vec<Value> {
    sink.records()
        .into_iter()
        .filter(|r| r["event_type"] == event_type)
        .collect()
}
