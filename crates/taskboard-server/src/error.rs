//! Request failures and their HTTP mapping.
//!
//! Client-facing bodies are always `{"error": "<message>"}`. Store details
//! are logged here and never returned.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use taskboard_core::ValidationError;
use taskboard_store::StoreError;

use crate::metrics::STORE_ERRORS_TOTAL;

/// The task operations exposed over HTTP.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `GET /api/tasks`
    List,
    /// `GET /api/tasks/{id}`
    Get,
    /// `POST /api/tasks`
    Create,
    /// `PUT /api/tasks/{id}`
    Update,
    /// `DELETE /api/tasks/{id}`
    Delete,
}

impl Operation {
    /// Metric label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Get => "get",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// Fixed message returned when the store fails.
    pub fn failure_message(self) -> &'static str {
        match self {
            Self::List => "Failed to fetch tasks",
            Self::Get => "Failed to fetch task",
            Self::Create => "Failed to create task",
            Self::Update => "Failed to update task",
            Self::Delete => "Failed to delete task",
        }
    }
}

/// A failed API request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Body failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Body was not a JSON object of the expected shape.
    #[error("Invalid request body")]
    InvalidBody,

    /// No task with the requested id.
    #[error("Task not found")]
    NotFound,

    /// The store failed while running `operation`.
    #[error("{}", .operation.failure_message())]
    Store {
        /// Operation that was running.
        operation: Operation,
        /// Underlying failure, logged only.
        #[source]
        source: StoreError,
    },
}

impl ApiError {
    /// Classify a store failure: a missing row is a 404, anything else a 500.
    pub fn from_store(operation: Operation, source: StoreError) -> Self {
        if source.is_not_found() {
            Self::NotFound
        } else {
            Self::Store { operation, source }
        }
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidBody => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Store { operation, source } = &self {
            error!(operation = operation.as_str(), error = %source, "store operation failed");
            metrics::counter!(STORE_ERRORS_TOTAL, "operation" => operation.as_str()).increment(1);
        }
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
