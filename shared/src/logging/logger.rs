//! Structured logger facade.
//!
//! Application code reports typed events here. Each event is encoded once,
//! written to the console sink, and, when a collector is configured, also
//! delivered to the collector. Logging never fails the caller: every
//! operation returns an [`EmitStatus`] instead of an error.

use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;

use super::context::RequestContext;
use super::event::{DbOperation, EventKind, LogLevel};
use super::formatter::{LogFormatter, ServiceIdentity};
use super::sink::{LogSink, StdoutSink};
use crate::collector::{Collector, Delivery};

/// Where an emitted event ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitStatus {
    /// Written to the console; no collector is configured.
    ConsoleOnly,
    /// Written to the console and accepted by the collector.
    Exported,
    /// Written to the console; the collector send failed and the event is lost.
    ExportFailed,
}

/// Facade for emitting typed events.
///
/// The process-wide logger has no request context. [`with_context`] returns a
/// copy scoped to one request; records emitted through it carry that
/// request's correlation data and nothing else's.
///
/// [`with_context`]: StructuredLogger::with_context
#[derive(Clone)]
pub struct StructuredLogger {
    formatter: Arc<LogFormatter>,
    sink: Arc<dyn LogSink>,
    collector: Collector,
    context: Option<Arc<RequestContext>>,
}

impl std::fmt::Debug for StructuredLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StructuredLogger")
            .field("identity", self.formatter.identity())
            .field("collector_enabled", &self.collector.is_enabled())
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

impl StructuredLogger {
    /// Creates a logger writing to `sink` and exporting through `collector`.
    #[must_use]
    pub fn new(formatter: LogFormatter, sink: Arc<dyn LogSink>, collector: Collector) -> Self {
        Self {
            formatter: Arc::new(formatter),
            sink,
            collector,
            context: None,
        }
    }

    /// Creates a logger writing JSON lines to standard output.
    #[must_use]
    pub fn stdout(identity: ServiceIdentity, collector: Collector) -> Self {
        Self::new(LogFormatter::new(identity), Arc::new(StdoutSink), collector)
    }

    /// Returns a copy of this logger scoped to one request.
    #[must_use]
    pub fn with_context(&self, context: RequestContext) -> Self {
        Self {
            context: Some(Arc::new(context)),
            ..self.clone()
        }
    }

    /// Returns the request context, if scoped.
    #[must_use]
    pub fn context(&self) -> Option<&RequestContext> {
        self.context.as_deref()
    }

    /// Returns the collector this logger exports through.
    #[must_use]
    pub fn collector(&self) -> &Collector {
        &self.collector
    }

    /// Logs a completed HTTP request.
    ///
    /// Default level: INFO below status 400, WARN otherwise.
    pub async fn log_request(
        &self,
        method: &str,
        endpoint: &str,
        status_code: u16,
        duration: Duration,
        level: Option<LogLevel>,
    ) -> EmitStatus {
        let kind = EventKind::HttpRequest {
            method: method.to_string(),
            endpoint: endpoint.to_string(),
            status_code,
            duration,
        };
        self.emit(&kind, level, None).await
    }

    /// Logs a database operation.
    ///
    /// Default level: INFO on success, ERROR on failure.
    pub async fn log_database_operation(
        &self,
        operation: DbOperation,
        table: &str,
        success: bool,
        error: Option<&str>,
        level: Option<LogLevel>,
    ) -> EmitStatus {
        let kind = EventKind::DatabaseOperation {
            operation,
            table: table.to_string(),
            success,
            error: error.map(ToString::to_string),
        };
        self.emit(&kind, level, None).await
    }

    /// Logs a business event.
    ///
    /// Object `data` is flattened into the record's fields; any other value is
    /// kept under a `data` key. Default level: INFO.
    pub async fn log_business_event(
        &self,
        event_type: &str,
        data: Option<Value>,
        level: Option<LogLevel>,
    ) -> EmitStatus {
        let kind = EventKind::BusinessEvent {
            event_type: event_type.to_string(),
            data: into_object(data, "data"),
        };
        self.emit(&kind, level, None).await
    }

    /// Logs an application error, with an optional stack trace.
    ///
    /// Default level: ERROR.
    pub async fn log_error(
        &self,
        error_type: &str,
        message: &str,
        stack_trace: Option<String>,
        context: Option<Value>,
        level: Option<LogLevel>,
    ) -> EmitStatus {
        let kind = EventKind::ApplicationError {
            error_type: error_type.to_string(),
            message: message.to_string(),
            context: into_object(context, "detail"),
        };
        self.emit(&kind, level, stack_trace).await
    }

    /// Emits one event: console first, then the collector.
    pub async fn emit(
        &self,
        kind: &EventKind,
        level: Option<LogLevel>,
        exception: Option<String>,
    ) -> EmitStatus {
        let event = self
            .formatter
            .build(kind, level, self.context.as_deref(), exception);
        let line = self.formatter.encode(&event);
        self.sink.write_line(&line);

        if event.level.is_health_signal() {
            metrics::counter!(
                "todo_log_events_total",
                "level" => event.level.as_str(),
                "event_type" => event.event_type.as_str(),
            )
            .increment(1);
        }

        if !self.collector.is_enabled() {
            return EmitStatus::ConsoleOnly;
        }

        let payload = serde_json::to_value(&event).unwrap_or(Value::String(line));
        match self
            .collector
            .deliver_event(payload, Some(event.timestamp))
            .await
        {
            Delivery::Accepted => EmitStatus::Exported,
            Delivery::Failed => EmitStatus::ExportFailed,
            Delivery::Disabled => EmitStatus::ConsoleOnly,
        }
    }
}

/// Turns an optional JSON value into an object, wrapping non-objects under `key`.
fn into_object(value: Option<Value>, key: &str) -> Map<String, Value> {
    match value {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(map)) => map,
        Some(other) => {
            let mut map = Map::new();
            map.insert(key.to_string(), other);
            map
        }
    }
}
