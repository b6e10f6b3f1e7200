//! Application state module.
//!
//! Defines the shared application state that is passed to route handlers.

use metrics_exporter_prometheus::PrometheusHandle;
use shared::collector::{Collector, CollectorConfig};
use shared::logging::{LogFormatter, LogSink, ServiceIdentity, StdoutSink, StructuredLogger};
use shared::storage::{InMemoryTodoStore, TodoStore};
use shared::telemetry::MetricsBridge;
use std::sync::Arc;

use crate::metrics::{self, PrometheusRegistry};

/// Application state shared across all request handlers.
///
/// Holds the todo store, the process-wide (unscoped) logger, the metrics
/// bridge and the collector settings. The logger and the bridge share one
/// collector.
#[derive(Clone)]
pub struct AppState {
    todo_store: Arc<dyn TodoStore>,
    logger: StructuredLogger,
    bridge: MetricsBridge,
    collector_config: Arc<CollectorConfig>,
    metrics: PrometheusRegistry,
}

impl AppState {
    /// Wires the state from its parts.
    ///
    /// The collector is built once from `collector_config`; if it cannot be
    /// built the service runs console-only.
    pub fn new(
        todo_store: Arc<dyn TodoStore>,
        sink: Arc<dyn LogSink>,
        collector_config: CollectorConfig,
        metrics_handle: PrometheusHandle,
    ) -> Self {
        let collector = Collector::from_config(&collector_config);
        let metrics = PrometheusRegistry::new(metrics_handle);
        let logger = StructuredLogger::new(
            LogFormatter::new(ServiceIdentity::default()),
            sink,
            collector.clone(),
        );
        let bridge = MetricsBridge::new(Arc::new(metrics.clone()), collector);

        Self {
            todo_store,
            logger,
            bridge,
            collector_config: Arc::new(collector_config),
            metrics,
        }
    }

    /// Creates the state used by the server: in-memory store, stdout sink.
    #[must_use]
    pub fn from_config(collector_config: CollectorConfig, metrics_handle: PrometheusHandle) -> Self {
        Self::new(
            Arc::new(InMemoryTodoStore::new()),
            Arc::new(StdoutSink),
            collector_config,
            metrics_handle,
        )
    }

    /// Creates a new application state with an in-memory store and no collector.
    ///
    /// This is useful for development and testing.
    #[must_use]
    pub fn with_in_memory_store() -> Self {
        Self::from_config(CollectorConfig::default(), metrics::detached_handle())
    }

    /// Returns a reference to the todo store.
    #[must_use]
    pub fn todo_store(&self) -> &dyn TodoStore {
        self.todo_store.as_ref()
    }

    /// Returns the process-wide logger (no request context).
    #[must_use]
    pub fn logger(&self) -> &StructuredLogger {
        &self.logger
    }

    /// Returns the metrics snapshot bridge.
    #[must_use]
    pub fn bridge(&self) -> &MetricsBridge {
        &self.bridge
    }

    /// Returns the collector settings the state was built from.
    #[must_use]
    pub fn collector_config(&self) -> &CollectorConfig {
        &self.collector_config
    }

    /// Returns the Prometheus registry.
    #[must_use]
    pub fn metrics(&self) -> &PrometheusRegistry {
        &self.metrics
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_in_memory_store()
    }
}
