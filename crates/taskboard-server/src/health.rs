//! `/api/health` endpoint.

use std::time::Instant;

use serde::Serialize;

use crate::bootstrap::SchemaState;

/// Health check response body.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Always `"healthy"` when the server is running.
    pub status: &'static str,
    /// Schema bootstrap progress: `pending`, `ready`, or `failed`.
    pub schema: &'static str,
    /// Seconds since the server started.
    pub uptime_secs: u64,
}

/// Build a health response. Liveness only; schema state is informational.
pub fn health_check(start_time: Instant, schema: &SchemaState) -> HealthResponse {
    HealthResponse {
        status: "healthy",
        schema: schema.label(),
        uptime_secs: start_time.elapsed().as_secs(),
    }
}
