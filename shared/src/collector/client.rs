//! HTTP event collector client.
//!
//! Posts single events and metric samples to a HEC-style collector endpoint.
//! Every send is one POST with a bounded timeout; failures are logged and
//! reported as `false`, never retried or queued.

use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

use super::config::CollectorConfig;

/// Default timeout applied to every collector request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Authorization scheme prefixed to the token.
pub const AUTH_SCHEME: &str = "Splunk";

/// Sourcetype used for metric envelopes.
pub const METRIC_SOURCETYPE: &str = "prometheus:metric";

/// Errors raised by the collector client.
#[derive(Debug, Error)]
pub enum CollectorError {
    /// URL or token is missing.
    #[error("Collector integration not configured")]
    NotConfigured,

    /// The token cannot be used as an HTTP header value.
    #[error("Invalid collector token: {0}")]
    InvalidToken(String),

    /// The HTTP client could not be built.
    #[error("Failed to build collector HTTP client: {0}")]
    Client(String),

    /// The request failed in transit (connection, TLS, timeout).
    #[error("Collector request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The collector answered with something other than 200.
    #[error("Collector rejected event with status {0}")]
    Rejected(StatusCode),
}

/// Client for one collector endpoint.
///
/// Cloning is cheap and clones share the underlying connection pool, so one
/// client can serve concurrent requests without extra locking.
#[derive(Debug, Clone)]
pub struct HecClient {
    client: reqwest::Client,
    endpoint: String,
    index: String,
    source: String,
    sourcetype: String,
    host: String,
}

impl HecClient {
    /// Creates a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The URL or token is missing
    /// - The token is not a valid header value
    /// - The HTTP client cannot be built
    pub fn new(config: &CollectorConfig) -> Result<Self, CollectorError> {
        let (Some(endpoint), Some(token)) = (config.endpoint(), config.token.as_deref()) else {
            return Err(CollectorError::NotConfigured);
        };

        let mut auth = HeaderValue::from_str(&format!("{AUTH_SCHEME} {token}"))
            .map_err(|e| CollectorError::InvalidToken(e.to_string()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()
            .map_err(|e| CollectorError::Client(e.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            index: config.index.clone(),
            source: config.source.clone(),
            sourcetype: config.sourcetype.clone(),
            host: config.host.clone(),
        })
    }

    /// Returns the full endpoint URL requests are posted to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends one event. `timestamp` defaults to now.
    ///
    /// Returns true only if the collector answered 200.
    pub async fn send_event(&self, payload: Value, timestamp: Option<DateTime<Utc>>) -> bool {
        let envelope = self.event_envelope(payload, timestamp.unwrap_or_else(Utc::now));
        match self.post(&envelope).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, endpoint = %self.endpoint, "Failed to send event to collector");
                false
            }
        }
    }

    /// Sends one metric sample. `timestamp` defaults to now.
    ///
    /// Labels are flattened next to `metric_name` and `_value`.
    /// Returns true only if the collector answered 200. NaN and infinite
    /// values have no JSON form and are never sent.
    pub async fn send_metric(
        &self,
        name: &str,
        value: f64,
        labels: &BTreeMap<String, String>,
        timestamp: Option<DateTime<Utc>>,
    ) -> bool {
        if !value.is_finite() {
            tracing::warn!(metric = name, value, "Refusing to send non-finite metric value");
            return false;
        }

        let envelope =
            self.metric_envelope(name, value, labels, timestamp.unwrap_or_else(Utc::now));
        match self.post(&envelope).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, metric = name, "Failed to send metric to collector");
                false
            }
        }
    }

    fn event_envelope(&self, payload: Value, timestamp: DateTime<Utc>) -> Value {
        json!({
            "time": epoch_seconds(timestamp),
            "host": self.host,
            "source": self.source,
            "sourcetype": self.sourcetype,
            "index": self.index,
            "event": payload,
        })
    }

    fn metric_envelope(
        &self,
        name: &str,
        value: f64,
        labels: &BTreeMap<String, String>,
        timestamp: DateTime<Utc>,
    ) -> Value {
        let mut fields = Map::new();
        fields.insert("metric_name".into(), Value::from(name));
        fields.insert("_value".into(), Value::from(value));
        for (key, label) in labels {
            fields
                .entry(key.clone())
                .or_insert_with(|| Value::from(label.as_str()));
        }

        json!({
            "time": epoch_seconds(timestamp),
            "host": self.host,
            "source": self.source,
            "sourcetype": METRIC_SOURCETYPE,
            "index": self.index,
            "event": "metric",
            "fields": fields,
        })
    }

    async fn post(&self, envelope: &Value) -> Result<(), CollectorError> {
        let response = self.client.post(&self.endpoint).json(envelope).send().await?;

        if response.status() == StatusCode::OK {
            Ok(())
        } else {
            Err(CollectorError::Rejected(response.status()))
        }
    }
}

/// Converts a timestamp to fractional seconds since the Unix epoch.
#[allow(clippy::cast_precision_loss)]
fn epoch_seconds(timestamp: DateTime<Utc>) -> f64 {
    timestamp.timestamp() as f64 + f64::from(timestamp.timestamp_subsec_micros()) / 1_000_000.0
}
