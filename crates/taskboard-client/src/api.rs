//! Typed client for the `/api` endpoints, backed by `reqwest`.

use std::time::Duration;

use reqwest::{Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use taskboard_core::{Task, TaskId, TaskInput, UpdatedTask};

/// Base URL used when none is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Errors from API calls.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a non-success status.
    #[error("{status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// The `error` field of the body, or the status reason.
        message: String,
    },

    /// The request failed to send or the response failed to decode.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ClientError {
    /// HTTP status of an API error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
        }
    }

    /// Whether the server reported the task as missing.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND.as_u16())
    }
}

/// Health endpoint body.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Health {
    /// `"healthy"` while the server runs.
    pub status: String,
    /// Schema bootstrap state.
    #[serde(default)]
    pub schema: Option<String>,
    /// Seconds since the server started.
    #[serde(default)]
    pub uptime_secs: Option<u64>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// HTTP client for the task API.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Client for the API rooted at `base_url` (e.g. `http://host:5000/api`).
    pub fn new(base_url: impl Into<String>) -> Self {
        let builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("taskboard/", env!("CARGO_PKG_VERSION")));
        Self::with_client(build_or_default(builder), base_url)
    }

    /// Client using an existing `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { http, base_url }
    }

    /// The API base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET /health
    pub async fn health(&self) -> Result<Health, ClientError> {
        let resp = self.http.get(self.url("/health")).send().await?;
        decode(resp).await
    }

    /// GET /tasks
    pub async fn list_tasks(&self) -> Result<Vec<Task>, ClientError> {
        let resp = self.http.get(self.url("/tasks")).send().await?;
        decode(resp).await
    }

    /// GET /tasks/{id}
    pub async fn get_task(&self, id: TaskId) -> Result<Task, ClientError> {
        let resp = self.http.get(self.url(&format!("/tasks/{id}"))).send().await?;
        decode(resp).await
    }

    /// POST /tasks
    pub async fn create_task(&self, input: &TaskInput) -> Result<Task, ClientError> {
        let resp = self.http.post(self.url("/tasks")).json(input).send().await?;
        decode(resp).await
    }

    /// PUT /tasks/{id}
    pub async fn update_task(
        &self,
        id: TaskId,
        input: &TaskInput,
    ) -> Result<UpdatedTask, ClientError> {
        let resp = self
            .http
            .put(self.url(&format!("/tasks/{id}")))
            .json(input)
            .send()
            .await?;
        decode(resp).await
    }

    /// DELETE /tasks/{id}
    pub async fn delete_task(&self, id: TaskId) -> Result<(), ClientError> {
        let resp = self.http.delete(self.url(&format!("/tasks/{id}"))).send().await?;
        let _ = check(resp).await?;
        Ok(())
    }
}

/// Build `builder`, falling back to a default client (no timeout, stock
/// user agent) with a warning when the configured one cannot be built.
fn build_or_default(builder: reqwest::ClientBuilder) -> reqwest::Client {
    match builder.build() {
        Ok(client) => client,
        Err(e) => {
            warn!(error = %e, "failed to build configured http client, using defaults");
            reqwest::Client::new()
        }
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    Ok(check(resp).await?.json().await?)
}

/// Turn a non-success response into [`ClientError::Api`].
async fn check(resp: Response) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let text = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text).map_or_else(
        |_| status.canonical_reason().unwrap_or("request failed").to_owned(),
        |body| body.error,
    );
    debug!(status = status.as_u16(), %message, "api call failed");
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}
