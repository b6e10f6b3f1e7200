//! Log record model.
//!
//! Defines the canonical `LogEvent` emitted by the structured logger, its
//! severity levels, and the typed event payloads that produce it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use thiserror::Error;

use super::context::RequestContext;

/// Log severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    /// Debug information.
    Debug,
    /// Informational messages.
    Info,
    /// Warning conditions.
    Warn,
    /// Error conditions.
    Error,
    /// Critical conditions.
    Critical,
    /// Synthetic events produced by test simulations.
    Dev,
}

impl LogLevel {
    /// Returns the upper-case wire name of the level.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
            Self::Dev => "DEV",
        }
    }

    /// Returns true if events at this level count toward deployment health.
    ///
    /// `Dev` events are synthetic and never count, whatever they describe.
    #[must_use]
    pub fn is_health_signal(self) -> bool {
        matches!(self, Self::Warn | Self::Error | Self::Critical)
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        Self::Info
    }
}

/// Error returned when parsing an unknown level name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown log level: '{0}'")]
pub struct ParseLevelError(pub String);

impl std::str::FromStr for LogLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(Self::Debug),
            "INFO" => Ok(Self::Info),
            "WARN" | "WARNING" => Ok(Self::Warn),
            "ERROR" => Ok(Self::Error),
            "CRITICAL" | "FATAL" => Ok(Self::Critical),
            "DEV" => Ok(Self::Dev),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

/// The kind of event a log record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// A completed HTTP request.
    HttpRequest,
    /// A database operation and its outcome.
    DatabaseOperation,
    /// A domain event such as a todo being created.
    BusinessEvent,
    /// An application error.
    ApplicationError,
}

impl EventType {
    /// Returns the snake-case wire name of the event type.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HttpRequest => "http_request",
            Self::DatabaseOperation => "database_operation",
            Self::BusinessEvent => "business_event",
            Self::ApplicationError => "application_error",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Database operation kinds reported by `database_operation` events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DbOperation {
    /// Row insertion.
    Insert,
    /// Row update.
    Update,
    /// Row deletion.
    Delete,
    /// Row read.
    Select,
}

impl DbOperation {
    /// Returns the SQL keyword for the operation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Select => "SELECT",
        }
    }
}

impl std::fmt::Display for DbOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed event as passed to the structured logger, before identity,
/// timestamp and request context are attached.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    /// A completed HTTP request.
    HttpRequest {
        /// HTTP method.
        method: String,
        /// Route or path that handled the request.
        endpoint: String,
        /// Response status code.
        status_code: u16,
        /// Wall-clock time spent handling the request.
        duration: Duration,
    },
    /// A database operation.
    DatabaseOperation {
        /// Operation kind.
        operation: DbOperation,
        /// Table the operation touched.
        table: String,
        /// Whether the operation succeeded.
        success: bool,
        /// Error description for failed operations.
        error: Option<String>,
    },
    /// A business event with free-form attributes.
    BusinessEvent {
        /// Free-form event name, e.g. `todo_created`.
        event_type: String,
        /// Attributes flattened into the record's `fields`.
        data: Map<String, Value>,
    },
    /// An application error.
    ApplicationError {
        /// Error category, e.g. `database_error`.
        error_type: String,
        /// Human-readable error message.
        message: String,
        /// Free-form context describing where the error happened.
        context: Map<String, Value>,
    },
}

impl EventKind {
    /// Returns the record's event type.
    #[must_use]
    pub fn event_type(&self) -> EventType {
        match self {
            Self::HttpRequest { .. } => EventType::HttpRequest,
            Self::DatabaseOperation { .. } => EventType::DatabaseOperation,
            Self::BusinessEvent { .. } => EventType::BusinessEvent,
            Self::ApplicationError { .. } => EventType::ApplicationError,
        }
    }

    /// Returns the severity used when the caller does not supply one.
    ///
    /// - requests: INFO below status 400, WARN otherwise
    /// - database operations: INFO on success, ERROR on failure
    /// - business events: INFO
    /// - application errors: ERROR
    #[must_use]
    pub fn default_level(&self) -> LogLevel {
        match self {
            Self::HttpRequest { status_code, .. } => {
                if *status_code < 400 {
                    LogLevel::Info
                } else {
                    LogLevel::Warn
                }
            }
            Self::DatabaseOperation { success, .. } => {
                if *success {
                    LogLevel::Info
                } else {
                    LogLevel::Error
                }
            }
            Self::BusinessEvent { .. } => LogLevel::Info,
            Self::ApplicationError { .. } => LogLevel::Error,
        }
    }

    /// Returns the human-readable summary line for the event.
    ///
    /// The format is stable: identical inputs always produce identical messages.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::HttpRequest {
                method,
                endpoint,
                status_code,
                duration,
            } => format!(
                "{method} {endpoint} {status_code} ({:.3}s)",
                duration.as_secs_f64()
            ),
            Self::DatabaseOperation {
                operation,
                table,
                success,
                ..
            } => format!(
                "Database {operation} on {table}: {}",
                if *success { "SUCCESS" } else { "FAILED" }
            ),
            Self::BusinessEvent { event_type, .. } => format!("Business event: {event_type}"),
            Self::ApplicationError {
                error_type,
                message,
                ..
            } => format!("Application error: {error_type} - {message}"),
        }
    }

    /// Builds the event-type specific `fields` mapping.
    #[must_use]
    pub fn fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        match self {
            Self::HttpRequest {
                method,
                endpoint,
                status_code,
                duration,
            } => {
                fields.insert("method".into(), Value::from(method.as_str()));
                fields.insert("endpoint".into(), Value::from(endpoint.as_str()));
                fields.insert("status_code".into(), Value::from(*status_code));
                fields.insert(
                    "duration_seconds".into(),
                    Value::from(duration.as_secs_f64()),
                );
            }
            Self::DatabaseOperation {
                operation,
                table,
                success,
                error,
            } => {
                fields.insert("operation".into(), Value::from(operation.as_str()));
                fields.insert("table".into(), Value::from(table.as_str()));
                fields.insert("success".into(), Value::from(*success));
                if let Some(error) = error {
                    fields.insert("error".into(), Value::from(error.as_str()));
                }
            }
            Self::BusinessEvent { event_type, data } => {
                // Reserved key wins over a colliding data attribute
                fields.extend(data.clone());
                fields.insert(
                    "business_event_type".into(),
                    Value::from(event_type.as_str()),
                );
            }
            Self::ApplicationError {
                error_type,
                message,
                context,
            } => {
                fields.insert("error_type".into(), Value::from(error_type.as_str()));
                fields.insert("error_message".into(), Value::from(message.as_str()));
                fields.insert("context".into(), Value::Object(context.clone()));
            }
        }
        fields
    }
}

/// The canonical emitted log record.
///
/// A `LogEvent` owns all of its data; once built it can be serialized at any
/// later point, from any thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEvent {
    /// Emission time.
    pub timestamp: DateTime<Utc>,

    /// Severity.
    pub level: LogLevel,

    /// Name of the emitting logger.
    #[serde(rename = "logger")]
    pub logger_name: String,

    /// Application identity.
    #[serde(rename = "app")]
    pub app_name: String,

    /// Service identity.
    #[serde(rename = "service")]
    pub service_name: String,

    /// Human-readable summary derived from the event.
    pub message: String,

    /// Kind of event.
    pub event_type: EventType,

    /// Request correlation data, present only inside a request scope.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<RequestContext>,

    /// Event-type specific attributes.
    #[serde(default)]
    pub fields: Map<String, Value>,

    /// Formatted stack trace for error-path emissions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception: Option<String>,
}
