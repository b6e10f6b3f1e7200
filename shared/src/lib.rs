//! Todo Service Shared Library
//!
//! This crate contains the todo model and storage abstraction, and the
//! observability pipeline used by the todo API.
//!
//! # Modules
//!
//! - [`models`] - Todo data model
//! - [`storage`] - Storage traits and implementations
//! - [`logging`] - Structured event records, request context, and the logger facade
//! - [`collector`] - Optional HTTP event collector export
//! - [`telemetry`] - Metrics registry snapshots and the export bridge
//!
//! # Example
//!
//! ```
//! use shared::models::NewTodo;
//! use shared::storage::{InMemoryTodoStore, TodoStore};
//!
//! let store = InMemoryTodoStore::new();
//! let todo = store.create(NewTodo::new("Ship it")).unwrap();
//!
//! assert!(todo.validate_todo().is_ok());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod collector;
pub mod logging;
pub mod models;
pub mod storage;
pub mod telemetry;

/// Re-export common dependencies for convenience.
pub use chrono;
pub use serde;
pub use serde_json;
pub use validator;
