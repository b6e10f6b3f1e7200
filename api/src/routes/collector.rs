//! Collector integration endpoints.
//!
//! Status reporting, a connection test, and on-demand export of the metrics
//! registry through the snapshot bridge.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use shared::logging::ServiceIdentity;
use shared::telemetry::ExportError;

use super::{api_error, ApiFailure};
use crate::state::AppState;

const NOT_CONFIGURED_HINT: &str =
    "Set TODO_COLLECTOR_URL and TODO_COLLECTOR_TOKEN environment variables";

/// Collector integration status.
#[derive(Debug, Serialize, Deserialize)]
pub struct CollectorStatusResponse {
    /// A collector client is configured.
    pub collector_configured: bool,
    /// Metric snapshots can be exported.
    pub metrics_exporter_available: bool,
    /// The structured logger forwards events to the collector.
    pub logger_available: bool,
    /// Non-secret view of the configuration.
    pub configuration: CollectorSettings,
}

/// Configuration summary. Never includes the URL or token values.
#[derive(Debug, Serialize, Deserialize)]
pub struct CollectorSettings {
    /// `TODO_COLLECTOR_URL` is set.
    pub url_set: bool,
    /// `TODO_COLLECTOR_TOKEN` is set.
    pub token_set: bool,
    /// Target index.
    pub index: String,
    /// Event source.
    pub source: String,
}

/// Result of a connection test.
#[derive(Debug, Serialize, Deserialize)]
pub struct ConnectionTestResponse {
    /// `success` or `failed`.
    pub status: String,
    /// Human-readable outcome.
    pub message: String,
}

/// Result of a metrics export.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExportResponse {
    /// Always `success` when the pass ran.
    pub status: String,
    /// Number of samples the collector accepted.
    pub exported_metrics: usize,
    /// Samples or registry lines that were not exported.
    pub errors: Vec<String>,
    /// When the pass completed.
    pub timestamp: DateTime<Utc>,
}

/// Creates the collector routes.
pub fn collector_routes(state: AppState) -> Router {
    Router::new()
        .route("/collector/status", get(collector_status))
        .route("/collector/test", post(test_connection))
        .route("/collector/export-metrics", post(export_metrics))
        .with_state(state)
}

fn not_configured() -> ApiFailure {
    api_error(
        StatusCode::BAD_REQUEST,
        "Collector integration not configured",
        NOT_CONFIGURED_HINT,
    )
}

async fn collector_status(State(state): State<AppState>) -> Json<CollectorStatusResponse> {
    let config = state.collector_config();

    Json(CollectorStatusResponse {
        collector_configured: state.logger().collector().is_enabled(),
        metrics_exporter_available: state.bridge().is_available(),
        logger_available: state.logger().collector().is_enabled(),
        configuration: CollectorSettings {
            url_set: config.url.is_some(),
            token_set: config.token.is_some(),
            index: config.index.clone(),
            source: config.source.clone(),
        },
    })
}

/// Sends one `connection_test` event directly through the collector client.
async fn test_connection(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ConnectionTestResponse>), ApiFailure> {
    let Some(client) = state.logger().collector().client() else {
        return Err(not_configured());
    };

    #[allow(clippy::cast_precision_loss)]
    let test_timestamp = Utc::now().timestamp_millis() as f64 / 1000.0;
    let event = json!({
        "event_type": "connection_test",
        "app": ServiceIdentity::default().app_name,
        "message": "Collector connection test",
        "test_timestamp": test_timestamp,
    });

    if client.send_event(event, None).await {
        Ok((
            StatusCode::OK,
            Json(ConnectionTestResponse {
                status: "success".to_string(),
                message: "Successfully connected to the collector".to_string(),
            }),
        ))
    } else {
        Ok((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ConnectionTestResponse {
                status: "failed".to_string(),
                message: "Failed to send test event to the collector".to_string(),
            }),
        ))
    }
}

async fn export_metrics(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ExportResponse>), ApiFailure> {
    match state.bridge().export_snapshot().await {
        Ok(result) => Ok((
            StatusCode::OK,
            Json(ExportResponse {
                status: "success".to_string(),
                exported_metrics: result.exported_count,
                errors: result.errors,
                timestamp: result.timestamp,
            }),
        )),
        Err(ExportError::NotConfigured) => Err(not_configured()),
    }
}
