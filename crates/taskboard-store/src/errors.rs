//! Error types for the task store.

use thiserror::Error;

use taskboard_core::TaskId;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// `SQLite` database error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Connection pool error (checkout timed out, connections failing).
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// Filesystem error while creating the database location.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A row held a value the model cannot represent.
    #[error("corrupt row in {table}.{column}: {detail}")]
    CorruptRow {
        /// Table name.
        table: &'static str,
        /// Column name.
        column: &'static str,
        /// What was wrong.
        detail: String,
    },

    /// No task with this id.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// A blocking store call was cancelled or panicked.
    #[error("internal error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Whether this error means the addressed task does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::TaskNotFound(_))
    }
}

/// Convenience type alias for store results.
pub type Result<T> = std::result::Result<T, StoreError>;
