//! Log record formatter.
//!
//! Turns a typed event into a `LogEvent` stamped with the service identity and
//! emission time, and encodes records as one JSON object per line.

use chrono::Utc;
use serde_json::json;

use super::context::RequestContext;
use super::event::{EventKind, LogEvent, LogLevel};

/// Static identity fields stamped onto every record.
///
/// Set once at process start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceIdentity {
    /// Logger name.
    pub logger_name: String,
    /// Application name.
    pub app_name: String,
    /// Service name.
    pub service_name: String,
}

impl ServiceIdentity {
    /// Creates an identity from its three names.
    #[must_use]
    pub fn new(
        logger_name: impl Into<String>,
        app_name: impl Into<String>,
        service_name: impl Into<String>,
    ) -> Self {
        Self {
            logger_name: logger_name.into(),
            app_name: app_name.into(),
            service_name: service_name.into(),
        }
    }
}

impl Default for ServiceIdentity {
    fn default() -> Self {
        Self::new("todoapp", "todoapp", "todo-api")
    }
}

/// Builds and encodes structured log records. Pure: performs no I/O.
#[derive(Debug, Clone, Default)]
pub struct LogFormatter {
    identity: ServiceIdentity,
}

impl LogFormatter {
    /// Creates a formatter for the given identity.
    #[must_use]
    pub fn new(identity: ServiceIdentity) -> Self {
        Self { identity }
    }

    /// Returns the identity stamped onto records.
    #[must_use]
    pub fn identity(&self) -> &ServiceIdentity {
        &self.identity
    }

    /// Builds the record for `kind`.
    ///
    /// `level` overrides the event's default severity. `context` is copied into
    /// the record, so the record stays valid after the request ends.
    #[must_use]
    pub fn build(
        &self,
        kind: &EventKind,
        level: Option<LogLevel>,
        context: Option<&RequestContext>,
        exception: Option<String>,
    ) -> LogEvent {
        LogEvent {
            timestamp: Utc::now(),
            level: level.unwrap_or_else(|| kind.default_level()),
            logger_name: self.identity.logger_name.clone(),
            app_name: self.identity.app_name.clone(),
            service_name: self.identity.service_name.clone(),
            message: kind.message(),
            event_type: kind.event_type(),
            context: context.cloned(),
            fields: kind.fields(),
            exception,
        }
    }

    /// Encodes a record as a single line of JSON, without a trailing newline.
    ///
    /// Never fails: if the record cannot be serialized, a minimal record
    /// carrying the timestamp, level, message and the encoding error is
    /// returned instead.
    #[must_use]
    pub fn encode(&self, event: &LogEvent) -> String {
        serde_json::to_string(event).unwrap_or_else(|e| minimal_record(event, &e.to_string()))
    }
}

/// Fallback encoding used when a full record cannot be serialized.
fn minimal_record(event: &LogEvent, error: &str) -> String {
    json!({
        "timestamp": event.timestamp,
        "level": event.level,
        "logger": event.logger_name,
        "app": event.app_name,
        "service": event.service_name,
        "message": event.message,
        "event_type": event.event_type,
        "format_error": error,
    })
    .to_string()
}
