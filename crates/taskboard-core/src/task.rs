//! The `Task` entity and its request payloads.
//!
//! [`TaskInput`] is the loosely-typed body accepted by create and update.
//! [`TaskInput::validate`] turns it into [`TaskFields`], the only shape the
//! store accepts, so a blank title never reaches SQL.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Store-assigned task identifier.
pub type TaskId = i64;

/// A persisted task.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Store-assigned id, never reused.
    pub id: TaskId,
    /// Non-empty title.
    pub title: String,
    /// Free text, empty when omitted.
    pub description: String,
    /// Insertion time, set by the store.
    pub created_at: DateTime<Utc>,
}

/// Response body of a successful update.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatedTask {
    /// Id of the updated row.
    pub id: TaskId,
    /// New title.
    pub title: String,
    /// New description.
    pub description: String,
}

/// Create/update request body as received over the wire.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskInput {
    /// Required; may be missing or blank on the wire.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Optional.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TaskInput {
    /// Build an input with both fields set.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: Some(description.into()),
        }
    }

    /// Check the title and default the description.
    ///
    /// The title is stored as sent; only its presence is checked.
    pub fn validate(self) -> Result<TaskFields, ValidationError> {
        let title = self
            .title
            .filter(|t| !t.trim().is_empty())
            .ok_or(ValidationError::TitleRequired)?;
        Ok(TaskFields {
            title,
            description: self.description.unwrap_or_default(),
        })
    }
}

/// Validated task fields, ready for the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskFields {
    /// Non-blank title.
    pub title: String,
    /// Description, `""` when omitted.
    pub description: String,
}

/// Request validation failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// `title` missing, empty, or whitespace only.
    #[error("Title is required")]
    TitleRequired,
}
