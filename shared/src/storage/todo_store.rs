//! Todo storage trait and implementations.
//!
//! Provides the `TodoStore` trait for abstracting todo persistence
//! and an `InMemoryTodoStore` implementation for development and testing.

use crate::models::{NewTodo, Todo, TodoPatch, TodoValidationError};
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Errors that can occur during todo store operations.
#[derive(Debug, Error)]
pub enum TodoStoreError {
    /// Failed to acquire lock on the store.
    #[error("Failed to acquire lock on todo store")]
    LockError,

    /// No todo exists with the given id.
    #[error("Todo {0} not found")]
    NotFound(u64),

    /// The todo failed validation and was not written.
    #[error(transparent)]
    Invalid(#[from] TodoValidationError),

    /// Generic storage error.
    #[error("Storage error: {0}")]
    StorageError(String),
}

/// Trait for todo storage implementations.
///
/// Implementations must be thread-safe (Send + Sync).
pub trait TodoStore: Send + Sync {
    /// Returns all todos ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn list(&self) -> Result<Vec<Todo>, TodoStoreError>;

    /// Returns a single todo.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no todo has the given id.
    fn get(&self, id: u64) -> Result<Todo, TodoStoreError>;

    /// Validates and stores a new todo, assigning its id.
    ///
    /// # Errors
    ///
    /// Returns an error if validation or the storage operation fails.
    fn create(&self, new: NewTodo) -> Result<Todo, TodoStoreError>;

    /// Applies a partial update to an existing todo.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no todo has the given id, or `Invalid` if the
    /// updated todo fails validation (the stored todo is left unchanged).
    fn update(&self, id: u64, patch: TodoPatch) -> Result<Todo, TodoStoreError>;

    /// Deletes a todo, returning it.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no todo has the given id.
    fn delete(&self, id: u64) -> Result<Todo, TodoStoreError>;

    /// Returns the number of stored todos.
    ///
    /// # Errors
    ///
    /// Returns an error if the count operation fails.
    fn count(&self) -> Result<usize, TodoStoreError>;
}

#[derive(Debug, Default)]
struct Inner {
    todos: BTreeMap<u64, Todo>,
    next_id: u64,
}

/// In-memory todo store implementation.
///
/// Ids start at 1 and are never reused, even after deletion.
///
/// **Note:** Data is not persisted across restarts.
///
/// # Example
///
/// ```
/// use shared::models::NewTodo;
/// use shared::storage::{InMemoryTodoStore, TodoStore};
///
/// let store = InMemoryTodoStore::new();
/// let todo = store.create(NewTodo::new("Water plants")).unwrap();
///
/// assert_eq!(todo.id, 1);
/// assert_eq!(store.count().unwrap(), 1);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryTodoStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryTodoStore {
    /// Creates a new empty in-memory todo store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TodoStore for InMemoryTodoStore {
    fn list(&self) -> Result<Vec<Todo>, TodoStoreError> {
        let inner = self.inner.read().map_err(|_| TodoStoreError::LockError)?;
        Ok(inner.todos.values().cloned().collect())
    }

    fn get(&self, id: u64) -> Result<Todo, TodoStoreError> {
        let inner = self.inner.read().map_err(|_| TodoStoreError::LockError)?;
        inner
            .todos
            .get(&id)
            .cloned()
            .ok_or(TodoStoreError::NotFound(id))
    }

    fn create(&self, new: NewTodo) -> Result<Todo, TodoStoreError> {
        let mut inner = self.inner.write().map_err(|_| TodoStoreError::LockError)?;

        let id = inner.next_id + 1;
        let todo = Todo {
            id,
            title: new.title,
            description: new.description,
            completed: new.completed,
            created_at: Utc::now(),
        };
        todo.validate_todo()?;

        inner.next_id = id;
        inner.todos.insert(id, todo.clone());
        Ok(todo)
    }

    fn update(&self, id: u64, patch: TodoPatch) -> Result<Todo, TodoStoreError> {
        let mut inner = self.inner.write().map_err(|_| TodoStoreError::LockError)?;

        let mut updated = inner
            .todos
            .get(&id)
            .cloned()
            .ok_or(TodoStoreError::NotFound(id))?;
        updated.apply(patch);
        updated.validate_todo()?;

        inner.todos.insert(id, updated.clone());
        Ok(updated)
    }

    fn delete(&self, id: u64) -> Result<Todo, TodoStoreError> {
        let mut inner = self.inner.write().map_err(|_| TodoStoreError::LockError)?;
        inner.todos.remove(&id).ok_or(TodoStoreError::NotFound(id))
    }

    fn count(&self) -> Result<usize, TodoStoreError> {
        let inner = self.inner.read().map_err(|_| TodoStoreError::LockError)?;
        Ok(inner.todos.len())
    }
}
