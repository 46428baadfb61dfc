//! # taskboard-store
//!
//! `SQLite` persistence for the `tasks` table.
//!
//! # Architecture
//!
//! - **[`connection`]**: `r2d2` connection pool with WAL mode and busy-timeout
//!   pragmas applied to every connection. Built lazily so a missing or
//!   unreachable database never blocks process startup.
//! - **[`schema`]**: database creation and idempotent table DDL.
//! - **[`repository`]**: stateless SQL functions. Each takes `&Connection`
//!   and runs exactly one statement.
//! - **[`store`]**: [`TaskStore`], the injected handle that checks a
//!   connection out of the pool per call.

#![deny(unsafe_code)]

pub mod connection;
pub mod errors;
pub mod repository;
pub mod schema;
pub mod store;

pub use connection::{ConnectionConfig, ConnectionPool, DatabaseLocation, PooledConnection};
pub use errors::{Result, StoreError};
pub use store::TaskStore;
