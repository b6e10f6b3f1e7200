//! Integration tests for the structured event stream.
//!
//! Tests cover:
//! - Request logging with the matched route and status-derived level
//! - Request context on every record emitted while handling a request
//! - Context isolation between concurrent requests
//! - Records emitted outside any request

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::collections::HashSet;

use super::common::{get, post_json, records_of, send, test_app};

#[tokio::test]
async fn test_request_is_logged_with_matched_route() {
    let app = test_app();
    post_json(app.router.clone(), "/api/todos", json!({"title": "a"})).await;

    let (status, _) = get(app.router, "/api/todos/1").await;
    assert_eq!(status, StatusCode::OK);

    let requests = records_of(&app.sink, "http_request");
    assert_eq!(requests.len(), 2);

    let last = &requests[1];
    assert_eq!(last["level"], "INFO");
    assert_eq!(last["fields"]["method"], "GET");
    assert_eq!(last["fields"]["endpoint"], "/api/todos/{id}");
    assert_eq!(last["fields"]["status_code"], 200);
    assert!(last["fields"]["duration_seconds"].as_f64().unwrap() >= 0.0);
    assert_eq!(last["context"]["path"], "/api/todos/1");
    assert_eq!(last["logger"], "todoapp");
    assert_eq!(last["service"], "todo-api");
}

#[tokio::test]
async fn test_client_errors_are_logged_as_warnings() {
    let app = test_app();

    get(app.router, "/api/todos/77").await;

    let requests = records_of(&app.sink, "http_request");
    assert_eq!(requests[0]["level"], "WARN");
    assert_eq!(requests[0]["fields"]["status_code"], 404);
    let message = requests[0]["message"].as_str().unwrap();
    assert!(message.starts_with("GET /api/todos/{id} 404 ("));
}

#[tokio::test]
async fn test_handler_records_share_the_request_id() {
    let app = test_app();

    let response = send(
        app.router,
        Request::builder()
            .method("POST")
            .uri("/api/todos")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::USER_AGENT, "integration-test")
            .body(Body::from(json!({"title": "a"}).to_string()))
            .unwrap(),
    )
    .await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();

    let records = app.sink.records();
    assert_eq!(records.len(), 3);
    for record in &records {
        assert_eq!(record["context"]["request_id"], request_id.as_str());
        assert_eq!(record["context"]["http_method"], "POST");
        assert_eq!(record["context"]["user_agent"], "integration-test");
    }
}

#[tokio::test]
async fn test_concurrent_requests_keep_their_own_context() {
    let app = test_app();

    let mut tasks = Vec::new();
    for i in 0..20 {
        let router = app.router.clone();
        tasks.push(tokio::spawn(async move {
            post_json(router, "/api/todos", json!({"title": format!("todo {i}")})).await
        }));
    }
    for task in tasks {
        let (status, _) = task.await.unwrap();
        assert_eq!(status, StatusCode::CREATED);
    }

    let records = app.sink.records();
    let request_ids: HashSet<String> = records_of(&app.sink, "http_request")
        .iter()
        .map(|r| r["context"]["request_id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(request_ids.len(), 20);

    // Each todo_created event must sit in the same request as its INSERT.
    for created in records_of(&app.sink, "business_event") {
        let id = &created["context"]["request_id"];
        let siblings: Vec<&Value> = records
            .iter()
            .filter(|r| &r["context"]["request_id"] == id)
            .collect();
        assert_eq!(siblings.len(), 3);
        assert!(siblings
            .iter()
            .any(|r| r["event_type"] == "database_operation"));
    }
}

#[tokio::test]
async fn test_process_logger_has_no_context() {
    let app = test_app();

    app.state
        .logger()
        .log_business_event("cache_warmed", Some(json!({"entries": 10})), None)
        .await;

    let records = app.sink.records();
    assert_eq!(records.len(), 1);
    assert!(records[0].get("context").is_none());
    assert_eq!(records[0]["fields"]["entries"], 10);
}
