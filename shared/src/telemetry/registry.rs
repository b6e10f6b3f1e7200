//! Metrics registry read interface.
//!
//! The bridge does not own the in-process metrics; it reads a snapshot of
//! them through [`MetricsRegistry`]. Snapshots from a Prometheus exposition
//! are produced by [`parse_prometheus_text`].

use prometheus_parse::{Scrape, Value};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Kind of the metric family a sample belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    /// Monotonic counter.
    Counter,
    /// Gauge.
    Gauge,
    /// Histogram (buckets, sum and count samples).
    Histogram,
    /// Summary (quantiles, sum and count samples).
    Summary,
    /// No type information available.
    #[serde(rename = "unknown")]
    Untyped,
}

impl MetricKind {
    /// Returns the Prometheus type name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Counter => "counter",
            Self::Gauge => "gauge",
            Self::Histogram => "histogram",
            Self::Summary => "summary",
            Self::Untyped => "unknown",
        }
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One observation read from the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    /// Sample name, e.g. `todo_request_duration_seconds_bucket`.
    pub name: String,
    /// Observed value.
    pub value: f64,
    /// Label set (may be empty).
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    /// Kind of the sample's family.
    pub metric_type: MetricKind,
}

impl MetricSample {
    /// Creates a sample without labels.
    #[must_use]
    pub fn new(name: impl Into<String>, value: f64, metric_type: MetricKind) -> Self {
        Self {
            name: name.into(),
            value,
            labels: BTreeMap::new(),
            metric_type,
        }
    }

    /// Adds a label.
    #[must_use]
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Returns the sample's labels plus a `metric_type` label.
    #[must_use]
    pub fn export_labels(&self) -> BTreeMap<String, String> {
        let mut labels = self.labels.clone();
        labels.insert("metric_type".to_string(), self.metric_type.to_string());
        labels
    }
}

/// Samples read in one pass, plus descriptions of anything unreadable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistrySnapshot {
    /// Readable samples, in registry order.
    pub samples: Vec<MetricSample>,
    /// One entry per part of the registry that could not be read.
    pub errors: Vec<String>,
}

/// Read access to an in-process metrics registry.
///
/// Snapshots need not be linearizable with concurrent increments.
pub trait MetricsRegistry: Send + Sync {
    /// Reads every currently registered sample.
    fn snapshot(&self) -> RegistrySnapshot;
}

/// A registry holding a fixed list of samples.
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    samples: Vec<MetricSample>,
}

impl StaticRegistry {
    /// Creates a registry that always returns `samples`.
    #[must_use]
    pub fn new(samples: Vec<MetricSample>) -> Self {
        Self { samples }
    }
}

impl MetricsRegistry for StaticRegistry {
    fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            samples: self.samples.clone(),
            errors: Vec::new(),
        }
    }
}

/// Parses the Prometheus text exposition format into samples.
///
/// Histograms yield one `<name>_bucket` sample per bucket, labelled `le`;
/// summaries yield one sample per quantile, labelled `quantile`. Their `_sum`
/// and `_count` samples take the kind of the family. Lines the parser does
/// not recognize are skipped.
#[must_use]
pub fn parse_prometheus_text(text: &str) -> RegistrySnapshot {
    let scrape = match Scrape::parse(text.lines().map(|line| Ok(line.to_owned()))) {
        Ok(scrape) => scrape,
        Err(e) => {
            return RegistrySnapshot {
                samples: Vec::new(),
                errors: vec![format!("Error reading metrics exposition: {e}")],
            }
        }
    };

    let families: HashMap<&str, MetricKind> = scrape
        .samples
        .iter()
        .filter_map(|sample| match sample.value {
            Value::Histogram(_) => Some((family_name(&sample.metric), MetricKind::Histogram)),
            Value::Summary(_) => Some((sample.metric.as_str(), MetricKind::Summary)),
            _ => None,
        })
        .collect();

    let mut snapshot = RegistrySnapshot::default();
    for sample in &scrape.samples {
        let labels: BTreeMap<String, String> = sample
            .labels
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let single = |value: f64, metric_type: MetricKind| MetricSample {
            name: sample.metric.clone(),
            value,
            labels: labels.clone(),
            metric_type,
        };

        match &sample.value {
            Value::Counter(v) => snapshot.samples.push(single(*v, MetricKind::Counter)),
            Value::Gauge(v) => snapshot.samples.push(single(*v, MetricKind::Gauge)),
            Value::Untyped(v) => {
                let kind = summary_part_kind(&families, &sample.metric)
                    .unwrap_or(MetricKind::Untyped);
                snapshot.samples.push(single(*v, kind));
            }
            Value::Histogram(buckets) => {
                let name = format!("{}_bucket", family_name(&sample.metric));
                snapshot.samples.extend(buckets.iter().map(|bucket| {
                    let mut labels = labels.clone();
                    labels.insert("le".to_string(), format_bound(bucket.less_than));
                    MetricSample {
                        name: name.clone(),
                        value: bucket.count,
                        labels,
                        metric_type: MetricKind::Histogram,
                    }
                }));
            }
            Value::Summary(quantiles) => {
                snapshot.samples.extend(quantiles.iter().map(|q| {
                    let mut labels = labels.clone();
                    labels.insert("quantile".to_string(), format_bound(q.quantile));
                    MetricSample {
                        name: sample.metric.clone(),
                        value: q.count,
                        labels,
                        metric_type: MetricKind::Summary,
                    }
                }));
            }
        }
    }

    snapshot
}

fn family_name(metric: &str) -> &str {
    metric.strip_suffix("_bucket").unwrap_or(metric)
}

/// Kind of the histogram or summary a `_sum`/`_count` sample belongs to.
fn summary_part_kind(families: &HashMap<&str, MetricKind>, name: &str) -> Option<MetricKind> {
    ["_sum", "_count"]
        .iter()
        .filter_map(|suffix| name.strip_suffix(suffix))
        .find_map(|family| families.get(family).copied())
}

fn format_bound(bound: f64) -> String {
    if bound.is_infinite() && bound.is_sign_positive() {
        "+Inf".to_string()
    } else {
        bound.to_string()
    }
}
