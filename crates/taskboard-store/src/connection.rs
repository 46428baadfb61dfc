//! `SQLite` connection pool with WAL mode enabled.
//!
//! Uses `r2d2` connection pooling with the `r2d2_sqlite` backend.
//! The [`PragmaCustomizer`] runs on each new connection. The pool is built
//! unchecked with no idle floor: connections open on demand, so building a
//! pool never touches the filesystem.

use std::path::{Path, PathBuf};
use std::time::Duration;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;

use crate::errors::Result;

/// Alias for the connection pool type.
pub type ConnectionPool = Pool<SqliteConnectionManager>;

/// Alias for a pooled connection. Returned to the pool on drop.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Where the database lives: a host directory plus a database name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatabaseLocation {
    directory: PathBuf,
    name: String,
}

impl DatabaseLocation {
    /// Database `name` hosted in `directory`.
    pub fn new(directory: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            name: name.into(),
        }
    }

    /// Host directory.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Database name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Database file path: `<directory>/<name>.db`.
    pub fn path(&self) -> PathBuf {
        self.directory.join(format!("{}.db", self.name))
    }
}

/// Configuration for the connection pool.
#[derive(Clone, Debug)]
pub struct ConnectionConfig {
    /// Maximum pool size (default: 10).
    pub pool_size: u32,
    /// How long a caller waits for a free connection (default: 30s).
    pub connection_timeout: Duration,
    /// `SQLite` busy timeout in milliseconds (default: 5000).
    pub busy_timeout_ms: u32,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            pool_size: 10,
            connection_timeout: Duration::from_secs(30),
            busy_timeout_ms: 5000,
        }
    }
}

/// `SQLite` pragma customizer that runs on each new connection.
#[derive(Debug)]
struct PragmaCustomizer {
    busy_timeout_ms: u32,
}

impl r2d2::CustomizeConnection<Connection, rusqlite::Error> for PragmaCustomizer {
    fn on_acquire(&self, conn: &mut Connection) -> std::result::Result<(), rusqlite::Error> {
        conn.execute_batch(&format!(
            "PRAGMA journal_mode = WAL;\
             PRAGMA busy_timeout = {};\
             PRAGMA synchronous = NORMAL;",
            self.busy_timeout_ms
        ))?;
        Ok(())
    }
}

/// Create a file-backed connection pool for `location`.
///
/// Does not open any connection. Failures to reach the database surface on
/// checkout.
pub fn new_pool(location: &DatabaseLocation, config: &ConnectionConfig) -> ConnectionPool {
    let manager = SqliteConnectionManager::file(location.path());
    Pool::builder()
        .max_size(config.pool_size)
        .min_idle(Some(0))
        .connection_timeout(config.connection_timeout)
        .connection_customizer(Box::new(PragmaCustomizer {
            busy_timeout_ms: config.busy_timeout_ms,
        }))
        .build_unchecked(manager)
}

/// Read the journal mode of a connection.
pub fn journal_mode(conn: &Connection) -> Result<String> {
    Ok(conn.query_row("PRAGMA journal_mode", [], |row| row.get(0))?)
}
