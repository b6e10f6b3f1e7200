//! Collector configuration.

use std::time::Duration;

use super::client::REQUEST_TIMEOUT;

/// Settings for the external event collector.
///
/// Read once at startup. A missing URL or token means the integration is
/// disabled; that is not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectorConfig {
    /// Collector base URL, e.g. `https://collector.internal:8088`.
    pub url: Option<String>,
    /// Static authentication token.
    pub token: Option<String>,
    /// Target index.
    pub index: String,
    /// Source label.
    pub source: String,
    /// Sourcetype label for events. Metrics always use `prometheus:metric`.
    pub sourcetype: String,
    /// Whether to verify the collector's TLS certificate.
    pub verify_tls: bool,
    /// Host name reported in every envelope.
    pub host: String,
    /// Timeout applied to each collector request.
    pub timeout: Duration,
}

impl CollectorConfig {
    /// Creates a configuration for the given endpoint with default labels.
    #[must_use]
    pub fn new(url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            token: Some(token.into()),
            ..Self::default()
        }
    }

    /// Builds a configuration from a variable lookup function.
    ///
    /// # Variables
    ///
    /// - `TODO_COLLECTOR_URL`, `TODO_COLLECTOR_TOKEN`: both required to enable the collector
    /// - `TODO_COLLECTOR_INDEX` (default: "main")
    /// - `TODO_COLLECTOR_SOURCE` (default: "todoapp")
    /// - `TODO_COLLECTOR_SOURCETYPE` (default: "json")
    /// - `TODO_COLLECTOR_VERIFY_TLS` (default: "true"; anything but "true" disables verification)
    /// - `TODO_COLLECTOR_TIMEOUT_SECS` (default: 10; unparseable or zero values use the default)
    /// - `HOSTNAME` (default: "localhost")
    ///
    /// Empty values count as absent.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            url: get("TODO_COLLECTOR_URL"),
            token: get("TODO_COLLECTOR_TOKEN"),
            index: get("TODO_COLLECTOR_INDEX").unwrap_or(defaults.index),
            source: get("TODO_COLLECTOR_SOURCE").unwrap_or(defaults.source),
            sourcetype: get("TODO_COLLECTOR_SOURCETYPE").unwrap_or(defaults.sourcetype),
            verify_tls: get("TODO_COLLECTOR_VERIFY_TLS")
                .map_or(true, |v| v.trim().eq_ignore_ascii_case("true")),
            host: get("HOSTNAME").unwrap_or(defaults.host),
            timeout: get("TODO_COLLECTOR_TIMEOUT_SECS")
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map_or(defaults.timeout, Duration::from_secs),
        }
    }

    /// Builds a configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Returns true if both URL and token are set.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.url.is_some() && self.token.is_some()
    }

    /// Returns the collector endpoint, `{base_url}/services/collector`.
    #[must_use]
    pub fn endpoint(&self) -> Option<String> {
        self.url
            .as_deref()
            .map(|url| format!("{}/services/collector", url.trim_end_matches('/')))
    }
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            url: None,
            token: None,
            index: "main".to_string(),
            source: "todoapp".to_string(),
            sourcetype: "json".to_string(),
            verify_tls: true,
            host: "localhost".to_string(),
            timeout: REQUEST_TIMEOUT,
        }
    }
}
