//! Data models for the todo service.

pub mod todo;

pub use todo::{NewTodo, Todo, TodoPatch, TodoValidationError};
