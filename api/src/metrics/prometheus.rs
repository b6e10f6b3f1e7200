//! Prometheus-backed metrics registry.

use metrics_exporter_prometheus::PrometheusHandle;
use shared::telemetry::{parse_prometheus_text, MetricsRegistry, RegistrySnapshot};

/// Reads snapshots from a Prometheus recorder handle.
#[derive(Clone)]
pub struct PrometheusRegistry {
    handle: PrometheusHandle,
}

impl PrometheusRegistry {
    /// Wraps a recorder handle.
    #[must_use]
    pub fn new(handle: PrometheusHandle) -> Self {
        Self { handle }
    }

    /// Renders the current Prometheus text exposition.
    #[must_use]
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

impl MetricsRegistry for PrometheusRegistry {
    fn snapshot(&self) -> RegistrySnapshot {
        parse_prometheus_text(&self.render())
    }
}
