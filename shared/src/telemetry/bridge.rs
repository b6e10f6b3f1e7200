//! Metrics snapshot bridge.
//!
//! Republishes every sample of the in-process registry through the collector
//! on demand. Unlike per-request logging, an export is explicitly requested,
//! so a missing collector is reported instead of silently skipped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use super::registry::MetricsRegistry;
use crate::collector::{Collector, Delivery};

/// Errors returned by an export pass.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExportError {
    /// No collector is configured.
    #[error("Collector integration not configured")]
    NotConfigured,
}

/// Outcome of one export pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportResult {
    /// Number of samples the collector accepted.
    pub exported_count: usize,
    /// One description per sample or registry part that was not exported, in order.
    pub errors: Vec<String>,
    /// When the pass completed.
    pub timestamp: DateTime<Utc>,
}

/// Pushes registry snapshots to the collector.
#[derive(Clone)]
pub struct MetricsBridge {
    registry: Arc<dyn MetricsRegistry>,
    collector: Collector,
}

impl MetricsBridge {
    /// Creates a bridge reading from `registry` and exporting through `collector`.
    #[must_use]
    pub fn new(registry: Arc<dyn MetricsRegistry>, collector: Collector) -> Self {
        Self {
            registry,
            collector,
        }
    }

    /// Returns true if exports can run.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.collector.is_enabled()
    }

    /// Exports every current sample, one collector request per sample.
    ///
    /// A failed sample is recorded in `errors` and the pass continues with the
    /// next one. NaN and infinite values are recorded as failures without a
    /// request.
    ///
    /// # Errors
    ///
    /// Returns `NotConfigured` without reading the registry if no collector is configured.
    pub async fn export_snapshot(&self) -> Result<ExportResult, ExportError> {
        if !self.collector.is_enabled() {
            return Err(ExportError::NotConfigured);
        }

        let snapshot = self.registry.snapshot();
        let mut errors = snapshot.errors;
        let mut exported_count = 0;

        for sample in &snapshot.samples {
            if !sample.value.is_finite() {
                errors.push(format!("Failed to export {}: non-finite value", sample.name));
                continue;
            }

            let labels = sample.export_labels();
            match self
                .collector
                .deliver_metric(&sample.name, sample.value, &labels, None)
                .await
            {
                Delivery::Accepted => exported_count += 1,
                Delivery::Failed => errors.push(format!("Failed to export {}", sample.name)),
                Delivery::Disabled => return Err(ExportError::NotConfigured),
            }
        }

        tracing::info!(
            exported = exported_count,
            failed = errors.len(),
            "Metrics snapshot exported"
        );

        Ok(ExportResult {
            exported_count,
            errors,
            timestamp: Utc::now(),
        })
    }
}
