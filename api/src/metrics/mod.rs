//! Request metrics for the todo service.
//!
//! Request counters and latency histograms are recorded through the `metrics`
//! facade. The Prometheus recorder renders them for `GET /metrics`, and
//! [`PrometheusRegistry`] exposes the same rendering to the snapshot bridge.

mod prometheus;

pub use prometheus::PrometheusRegistry;

use anyhow::Result;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Counter of handled requests, labelled by method and endpoint.
pub const REQUESTS_TOTAL: &str = "todo_requests_total";

/// Histogram of request latency in seconds.
pub const REQUEST_DURATION_SECONDS: &str = "todo_request_duration_seconds";

/// Counter of WARN and more severe log events.
pub const LOG_EVENTS_TOTAL: &str = "todo_log_events_total";

const LATENCY_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.075, 0.1, 0.25, 0.5, 0.75, 1.0, 2.5, 5.0, 7.5, 10.0,
];

fn builder() -> Result<PrometheusBuilder> {
    Ok(PrometheusBuilder::new().set_buckets(LATENCY_BUCKETS)?)
}

/// Installs the Prometheus recorder as the global `metrics` recorder.
///
/// # Errors
///
/// Returns an error if a global recorder is already installed.
pub fn install_recorder() -> Result<PrometheusHandle> {
    let handle = builder()?.install_recorder()?;
    describe();
    tracing::info!("Prometheus metrics recorder installed");
    Ok(handle)
}

/// Builds a recorder handle that is not installed globally.
///
/// Nothing recorded through the `metrics` macros reaches it, so it renders an
/// empty exposition. Used when the process already has a recorder or in tests.
#[must_use]
pub fn detached_handle() -> PrometheusHandle {
    PrometheusBuilder::new().build_recorder().handle()
}

fn describe() {
    metrics::describe_counter!(REQUESTS_TOTAL, "Total requests");
    metrics::describe_histogram!(
        REQUEST_DURATION_SECONDS,
        metrics::Unit::Seconds,
        "Request latency"
    );
    metrics::describe_counter!(LOG_EVENTS_TOTAL, "Log events at WARN or above");
}

/// Records one handled request.
pub fn record_request(method: &str, endpoint: &str, duration: Duration) {
    metrics::counter!(
        REQUESTS_TOTAL,
        "method" => method.to_string(),
        "endpoint" => endpoint.to_string(),
    )
    .increment(1);
    metrics::histogram!(REQUEST_DURATION_SECONDS).record(duration.as_secs_f64());
}
