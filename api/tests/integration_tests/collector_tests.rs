//! Integration tests for the collector integration.
//!
//! Tests cover:
//! - Status reporting
//! - Connection test against a live and a failing collector
//! - Forwarding of the event stream
//! - Metric snapshot export
//! - Service behavior when the collector is down

use axum::http::StatusCode;
use metrics::Recorder;
use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::{json, Value};
use shared::collector::CollectorConfig;
use shared::storage::InMemoryTodoStore;
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::common::{
    get, post_empty, post_json, records_of, test_app, test_app_with, test_app_with_collector,
};

async fn collector_answering(status: u16) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/services/collector"))
        .respond_with(ResponseTemplate::new(status))
        .mount(&server)
        .await;
    server
}

async fn received_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect()
}

#[tokio::test]
async fn test_status_when_configured() {
    let server = collector_answering(200).await;
    let app = test_app_with_collector(&server.uri());

    let (status, body) = get(app.router, "/collector/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["collector_configured"], true);
    assert_eq!(body["metrics_exporter_available"], true);
    assert_eq!(body["logger_available"], true);
    assert_eq!(body["configuration"]["url_set"], true);
    assert_eq!(body["configuration"]["token_set"], true);
    assert!(body["configuration"].get("token").is_none());
}

#[tokio::test]
async fn test_connection_test_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/services/collector"))
        .and(header("authorization", "Splunk test-token"))
        .and(body_partial_json(json!({
            "sourcetype": "json",
            "index": "main",
            "event": {"event_type": "connection_test", "app": "todoapp"}
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let app = test_app_with_collector(&server.uri());
    let (status, body) = post_empty(app.router, "/collector/test").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
}

#[tokio::test]
async fn test_connection_test_reports_failure() {
    let server = collector_answering(503).await;
    let app = test_app_with_collector(&server.uri());

    let (status, body) = post_empty(app.router, "/collector/test").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], "failed");
}

#[tokio::test]
async fn test_not_configured_endpoints_return_400() {
    let app = test_app();

    let (status, body) = post_empty(app.router.clone(), "/collector/test").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Collector integration not configured");

    let (status, _) = post_empty(app.router, "/collector/export-metrics").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_event_stream_is_forwarded() {
    let server = collector_answering(200).await;
    let app = test_app_with_collector(&server.uri());

    post_json(app.router, "/api/todos", json!({"title": "Ship it"})).await;

    let bodies = received_bodies(&server).await;
    assert_eq!(bodies.len(), 3);

    let event_types: Vec<&str> = bodies
        .iter()
        .map(|b| b["event"]["event_type"].as_str().unwrap())
        .collect();
    assert_eq!(
        event_types,
        vec!["business_event", "database_operation", "http_request"]
    );

    // The exported event is the console record.
    let console = app.sink.records();
    assert_eq!(bodies[0]["event"], console[0]);
    assert_eq!(bodies[0]["source"], "todoapp");
    assert!(bodies[0]["time"].as_f64().unwrap() > 0.0);
}

#[tokio::test]
async fn test_collector_outage_does_not_affect_requests() {
    let server = collector_answering(500).await;
    let app = test_app_with_collector(&server.uri());

    let (status, created) = post_json(app.router, "/api/todos", json!({"title": "Resilient"})).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["title"], "Resilient");
    assert_eq!(records_of(&app.sink, "business_event").len(), 1);
    assert_eq!(records_of(&app.sink, "http_request").len(), 1);
}

#[tokio::test]
async fn test_export_metrics_sends_each_sample() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "sourcetype": "prometheus:metric",
            "event": "metric",
            "fields": {
                "metric_name": "todo_requests_total",
                "_value": 2.0,
                "method": "GET",
                "metric_type": "counter"
            }
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let recorder = PrometheusBuilder::new().build_recorder();
    let key = metrics::Key::from_parts(
        "todo_requests_total",
        vec![
            metrics::Label::new("method", "GET"),
            metrics::Label::new("endpoint", "/api/todos"),
        ],
    );
    let metadata = metrics::Metadata::new(module_path!(), metrics::Level::INFO, None);
    recorder.register_counter(&key, &metadata).increment(2);

    let app = test_app_with(
        Arc::new(InMemoryTodoStore::new()),
        CollectorConfig::new(server.uri(), "test-token"),
        recorder.handle(),
    );

    let (status, body) = post_empty(app.router, "/collector/export-metrics").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["exported_metrics"], 1);
    assert!(body["errors"].as_array().unwrap().is_empty());
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_export_metrics_reports_failed_samples() {
    let server = collector_answering(500).await;

    let recorder = PrometheusBuilder::new().build_recorder();
    let metadata = metrics::Metadata::new(module_path!(), metrics::Level::INFO, None);
    recorder
        .register_gauge(&metrics::Key::from_name("todo_open_items"), &metadata)
        .set(4.0);

    let app = test_app_with(
        Arc::new(InMemoryTodoStore::new()),
        CollectorConfig::new(server.uri(), "test-token"),
        recorder.handle(),
    );

    let (status, body) = post_empty(app.router, "/collector/export-metrics").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["exported_metrics"], 0);
    assert_eq!(body["errors"], json!(["Failed to export todo_open_items"]));
}
