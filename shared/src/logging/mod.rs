//! Structured event logging.
//!
//! # Data Flow
//!
//! ```text
//! handler ──▶ StructuredLogger ──▶ LogFormatter ──▶ LogSink (stdout, one JSON object per line)
//!                    │
//!                    └──────────▶ Collector (optional HTTP export)
//! ```
//!
//! # Example
//!
//! ```
//! use shared::collector::Collector;
//! use shared::logging::{LogFormatter, MemorySink, RequestContext, StructuredLogger};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let sink = MemorySink::new();
//! let logger = StructuredLogger::new(LogFormatter::default(), Arc::new(sink.clone()), Collector::Disabled);
//!
//! let scoped = logger.with_context(RequestContext::new("POST", "/api/todos"));
//! scoped
//!     .log_request("POST", "/api/todos", 201, Duration::from_millis(42), None)
//!     .await;
//!
//! assert_eq!(sink.records()[0]["message"], "POST /api/todos 201 (0.042s)");
//! # });
//! ```

pub mod context;
pub mod event;
pub mod formatter;
pub mod logger;
pub mod sink;

pub use context::RequestContext;
pub use event::{DbOperation, EventKind, EventType, LogEvent, LogLevel, ParseLevelError};
pub use formatter::{LogFormatter, ServiceIdentity};
pub use logger::{EmitStatus, StructuredLogger};
pub use sink::{LogSink, MemorySink, StdoutSink};
