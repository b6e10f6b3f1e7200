//! Storage traits and implementations.
//!
//! The `TodoStore` trait defines the interface for todo persistence, allowing
//! different implementations (in-memory, database-backed, etc.).

pub mod todo_store;

pub use todo_store::{InMemoryTodoStore, TodoStore, TodoStoreError};
