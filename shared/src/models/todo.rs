//! Todo data model.
//!
//! Defines the `Todo` record stored by the todo service and the request
//! shapes used to create and update it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

/// A single todo item.
///
/// # Example
///
/// ```
/// use shared::models::Todo;
///
/// let todo = Todo::new(1, "Buy milk").with_description("2 litres");
///
/// assert_eq!(todo.id, 1);
/// assert!(!todo.completed);
/// assert!(todo.validate_todo().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Todo {
    /// Store-assigned identifier.
    pub id: u64,

    /// Short title, required.
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: String,

    /// Optional longer description.
    #[serde(default)]
    #[validate(length(max = 200, message = "Description must be at most 200 characters"))]
    pub description: String,

    /// Whether the todo has been completed.
    #[serde(default)]
    pub completed: bool,

    /// When the todo was created.
    pub created_at: DateTime<Utc>,
}

/// Errors that can occur during todo validation.
#[derive(Debug, Error)]
pub enum TodoValidationError {
    /// The title is empty or only whitespace.
    #[error("Title is required")]
    MissingTitle,

    /// Validation failed with details.
    #[error("Validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),
}

impl Todo {
    /// Creates a new, not yet completed todo stamped with the current time.
    #[must_use]
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            completed: false,
            created_at: Utc::now(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the completed flag.
    #[must_use]
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    /// Applies a partial update, leaving absent fields untouched.
    pub fn apply(&mut self, patch: TodoPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
    }

    /// Validates the todo.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The title is blank
    /// - The title or description exceed their maximum length
    pub fn validate_todo(&self) -> Result<(), TodoValidationError> {
        if self.title.trim().is_empty() {
            return Err(TodoValidationError::MissingTitle);
        }
        self.validate()?;
        Ok(())
    }
}

/// Fields accepted when creating a todo.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewTodo {
    /// Title, required.
    pub title: String,

    /// Description (defaults to empty).
    #[serde(default)]
    pub description: String,

    /// Completed flag (defaults to false).
    #[serde(default)]
    pub completed: bool,
}

impl NewTodo {
    /// Creates a new todo request with only a title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Partial update of a todo. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TodoPatch {
    /// New title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// New description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// New completed flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TodoPatch {
    /// Returns true if the patch would change nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.completed.is_none()
    }
}
