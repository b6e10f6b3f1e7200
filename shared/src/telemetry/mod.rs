//! Metrics registry access and the snapshot bridge to the collector.

pub mod bridge;
pub mod registry;

pub use bridge::{ExportError, ExportResult, MetricsBridge};
pub use registry::{
    parse_prometheus_text, MetricKind, MetricSample, MetricsRegistry, RegistrySnapshot,
    StaticRegistry,
};
