//! API route definitions.
//!
//! This module organizes all HTTP routes for the todo API server.

mod collector;
mod health;
mod metrics;
mod todos;

pub use collector::collector_routes;
pub use health::health_routes;
pub use metrics::metrics_routes;
pub use todos::todos_routes;

use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};

/// Error body returned by the JSON endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    /// Error type.
    pub error: String,
    /// Detailed error message.
    pub message: String,
}

/// Handler error: a status code and an [`ApiError`] body.
pub type ApiFailure = (StatusCode, Json<ApiError>);

fn api_error(status: StatusCode, error: &str, message: impl Into<String>) -> ApiFailure {
    (
        status,
        Json(ApiError {
            error: error.to_string(),
            message: message.into(),
        }),
    )
}
