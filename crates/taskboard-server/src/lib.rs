//! # taskboard-server
//!
//! Axum REST server over the `tasks` table.
//!
//! - `/api/tasks` CRUD handlers that run one SQL statement each on the
//!   blocking pool
//! - Background schema bootstrap with fixed-interval retries, reported on
//!   `/api/health`
//! - Prometheus `/metrics`, permissive CORS, request tracing
//! - Shutdown via `tokio::signal` + `CancellationToken`

#![deny(unsafe_code)]

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod handlers;
pub mod health;
pub mod metrics;
pub mod server;
pub mod shutdown;

pub use bootstrap::{SchemaBootstrap, SchemaState};
pub use config::ServerConfig;
pub use error::{ApiError, Operation};
pub use server::{AppState, TaskServer};
pub use shutdown::ShutdownCoordinator;
