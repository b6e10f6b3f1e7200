//! Todo API Server
//!
//! This crate provides the HTTP server for the todo service. Besides the todo
//! CRUD endpoints it wires the observability pipeline from `shared`: every
//! request is logged as a structured event, handlers report database
//! operations and business events, and a configured collector receives all
//! of them plus on-demand metric snapshots.
//!
//! # Example
//!
//! ```no_run
//! use api::run_server;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     run_server().await
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod config;
pub mod context;
pub mod metrics;
mod routes;
pub mod state;

pub use config::Config;
pub use routes::ApiError;
pub use state::AppState;

use anyhow::Result;
use axum::{middleware, Router};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Runs the todo API server.
///
/// This function initializes the server with configuration from environment variables
/// and starts listening for incoming connections. It handles graceful shutdown on
/// SIGTERM/SIGINT signals.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration cannot be loaded from environment
/// - The server fails to bind to the configured address
/// - A fatal error occurs during operation
pub async fn run_server() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    run_server_with_config(config).await
}

/// Runs the todo API server with the provided configuration.
///
/// Installs the global Prometheus recorder, so it can be called once per process.
///
/// # Errors
///
/// Returns an error if:
/// - A metrics recorder is already installed
/// - The server fails to bind to the configured address
/// - A fatal error occurs during operation
pub async fn run_server_with_config(config: Config) -> Result<()> {
    let addr = config.socket_addr()?;

    tracing::info!(
        host = %config.host,
        port = %config.port,
        collector_configured = config.collector.is_configured(),
        "Todo API server starting"
    );

    let metrics_handle = metrics::install_recorder()?;
    let state = AppState::from_config(config.collector, metrics_handle);

    state
        .logger()
        .log_business_event(
            "service_started",
            Some(serde_json::json!({"address": addr.to_string()})),
            None,
        )
        .await;

    let app = create_router(state);
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(%addr, "Listening for connections");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Creates the main application router with all routes and middleware.
///
/// This function is public to allow testing the router without starting a full server.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health_routes())
        .merge(routes::todos_routes(state.clone()))
        .merge(routes::collector_routes(state.clone()))
        .merge(routes::metrics_routes(state.clone()))
        .layer(middleware::from_fn_with_state(
            state,
            context::request_context,
        ))
        .layer(TraceLayer::new_for_http())
}

/// Waits for a shutdown signal (SIGTERM or SIGINT).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
