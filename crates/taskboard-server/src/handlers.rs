//! `/api/tasks` handlers.
//!
//! Each handler validates its input, runs one store call on the blocking
//! pool, and maps the outcome to a status code. Nothing is cached between
//! requests.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::Value;
use tracing::debug;

use taskboard_core::{Task, TaskFields, TaskId, TaskInput, UpdatedTask};
use taskboard_store::{StoreError, TaskStore};

use crate::error::{ApiError, Operation};
use crate::metrics::HTTP_REQUESTS_TOTAL;
use crate::server::AppState;

/// GET /api/tasks
pub async fn list_tasks(State(state): State<AppState>) -> Result<Json<Vec<Task>>, ApiError> {
    let op = begin(Operation::List);
    let tasks = run_store(&state.store, op, TaskStore::list_tasks).await?;
    Ok(Json(tasks))
}

/// GET /api/tasks/{id}
pub async fn get_task(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    let op = begin(Operation::Get);
    let id = parse_id(&raw_id)?;
    run_store(&state.store, op, move |store| store.get_task(id))
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

/// POST /api/tasks
pub async fn create_task(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let op = begin(Operation::Create);
    let fields = validate_body(&body)?;
    let task = run_store(&state.store, op, move |store| store.create_task(&fields)).await?;
    debug!(task_id = task.id, "task created");
    Ok((StatusCode::CREATED, Json(task)))
}

/// PUT /api/tasks/{id}
pub async fn update_task(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<Json<UpdatedTask>, ApiError> {
    let op = begin(Operation::Update);
    let id = parse_id(&raw_id)?;
    let fields = validate_body(&body)?;
    let updated = run_store(&state.store, op, move |store| store.update_task(id, &fields)).await?;
    Ok(Json(updated))
}

/// DELETE /api/tasks/{id}
pub async fn delete_task(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let op = begin(Operation::Delete);
    let id = parse_id(&raw_id)?;
    run_store(&state.store, op, move |store| store.delete_task(id)).await?;
    debug!(task_id = id, "task deleted");
    Ok(StatusCode::NO_CONTENT)
}

fn begin(op: Operation) -> Operation {
    metrics::counter!(HTTP_REQUESTS_TOTAL, "operation" => op.as_str()).increment(1);
    op
}

/// A path id that is not an integer addresses no row.
fn parse_id(raw: &str) -> Result<TaskId, ApiError> {
    raw.parse().map_err(|_| ApiError::NotFound)
}

/// Parse a task body whatever its content type. An empty body carries no
/// fields, so it fails on the missing title rather than as malformed.
fn validate_body(body: &[u8]) -> Result<TaskFields, ApiError> {
    if body.trim_ascii().is_empty() {
        return Ok(TaskInput::default().validate()?);
    }
    let input = serde_json::from_slice::<Value>(body)
        .and_then(|value| match value {
            Value::Object(_) => serde_json::from_value::<TaskInput>(value),
            other => Err(<serde_json::Error as serde::de::Error>::custom(format!(
                "expected an object, got {other}"
            ))),
        })
        .map_err(|e| {
            debug!(error = %e, "rejected request body");
            ApiError::InvalidBody
        })?;
    Ok(input.validate()?)
}

/// Run one blocking store call off the async runtime.
async fn run_store<T, F>(store: &TaskStore, op: Operation, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&TaskStore) -> taskboard_store::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let store = store.clone();
    tokio::task::spawn_blocking(move || f(&store))
        .await
        .map_err(|e| StoreError::Internal(e.to_string()))
        .and_then(|result| result)
        .map_err(|e| ApiError::from_store(op, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_accepts_integers() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert_eq!(parse_id("-1").unwrap(), -1);
    }

    #[test]
    fn parse_id_rejects_non_integers_as_not_found() {
        for raw in ["abc", "1.5", "", "99999999999999999999"] {
            assert!(matches!(parse_id(raw), Err(ApiError::NotFound)), "{raw}");
        }
    }

    #[test]
    fn validate_body_defaults_description() {
        let fields = validate_body(br#"{"title": "A"}"#).unwrap();
        assert_eq!(fields.title, "A");
        assert_eq!(fields.description, "");
    }

    #[test]
    fn validate_body_rejects_blank_title() {
        let err = validate_body(br#"{"title": "   ", "description": "x"}"#).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn empty_body_is_missing_title() {
        for body in [&b""[..], &b"  \n"[..], &b"{}"[..]] {
            let err = validate_body(body).unwrap_err();
            assert!(matches!(err, ApiError::Validation(_)), "{body:?}");
        }
    }

    #[test]
    fn non_json_body_is_invalid() {
        let err = validate_body(b"title=A").unwrap_err();
        assert!(matches!(err, ApiError::InvalidBody));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn non_object_json_is_invalid() {
        for body in [&br#"["A", "B"]"#[..], &b"null"[..], &br#""A""#[..]] {
            assert!(matches!(validate_body(body), Err(ApiError::InvalidBody)), "{body:?}");
        }
    }
}
