//! Integration tests for health check and general API functionality.
//!
//! Tests cover:
//! - Health check endpoint
//! - Empty store behavior
//! - Prometheus scrape endpoint

use axum::http::StatusCode;

use super::common::{get, test_app};

#[tokio::test]
async fn test_health_check() {
    let app = test_app();

    let (status, response) = get(app.router, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["status"], "healthy");
    assert_eq!(response["service"], "todo-api");
}

#[tokio::test]
async fn test_empty_store_returns_empty_list() {
    let app = test_app();

    let (status, response) = get(app.router, "/api/todos").await;
    assert_eq!(status, StatusCode::OK);
    assert!(response.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = test_app();

    let (status, _) = get(app.router, "/api/nothing-here").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
