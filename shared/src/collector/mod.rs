//! External event collector integration.
//!
//! The collector is optional. [`Collector`] is either `Disabled` (no URL or
//! token configured) or `Enabled` with a [`HecClient`]; callers ask it to
//! deliver and get a [`Delivery`] back instead of checking for a client.

pub mod client;
pub mod config;

pub use client::{CollectorError, HecClient, AUTH_SCHEME, METRIC_SOURCETYPE, REQUEST_TIMEOUT};
pub use config::CollectorConfig;

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::BTreeMap;

/// Outcome of handing one event or sample to the collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// No collector is configured; nothing was sent.
    Disabled,
    /// The collector accepted the payload.
    Accepted,
    /// The send failed (transport error, timeout, or non-200 answer).
    Failed,
}

impl Delivery {
    fn from_sent(ok: bool) -> Self {
        if ok {
            Self::Accepted
        } else {
            Self::Failed
        }
    }
}

/// Optional collector integration.
#[derive(Debug, Clone, Default)]
pub enum Collector {
    /// Integration disabled.
    #[default]
    Disabled,
    /// Integration enabled.
    Enabled(HecClient),
}

impl Collector {
    /// Builds the collector from configuration.
    ///
    /// Unconfigured settings yield `Disabled` silently. A configured collector
    /// whose client cannot be built is logged and also yields `Disabled`.
    #[must_use]
    pub fn from_config(config: &CollectorConfig) -> Self {
        if !config.is_configured() {
            tracing::info!("Collector integration not configured");
            return Self::Disabled;
        }

        match HecClient::new(config) {
            Ok(client) => {
                tracing::info!(endpoint = %client.endpoint(), "Collector integration enabled");
                Self::Enabled(client)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to initialize collector integration");
                Self::Disabled
            }
        }
    }

    /// Returns true if a collector client is configured.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled(_))
    }

    /// Returns the client, if enabled.
    #[must_use]
    pub fn client(&self) -> Option<&HecClient> {
        match self {
            Self::Disabled => None,
            Self::Enabled(client) => Some(client),
        }
    }

    /// Delivers one event.
    pub async fn deliver_event(
        &self,
        payload: Value,
        timestamp: Option<DateTime<Utc>>,
    ) -> Delivery {
        match self {
            Self::Disabled => Delivery::Disabled,
            Self::Enabled(client) => {
                Delivery::from_sent(client.send_event(payload, timestamp).await)
            }
        }
    }

    /// Delivers one metric sample.
    pub async fn deliver_metric(
        &self,
        name: &str,
        value: f64,
        labels: &BTreeMap<String, String>,
        timestamp: Option<DateTime<Utc>>,
    ) -> Delivery {
        match self {
            Self::Disabled => Delivery::Disabled,
            Self::Enabled(client) => Delivery::from_sent(
                client.send_metric(name, value, labels, timestamp).await,
            ),
        }
    }
}
