//! Todo API Server Binary
//!
//! Entry point for the todo service.

#![deny(unsafe_code)]

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    // Diagnostics as JSON lines, same as the event stream
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    api::run_server().await
}
