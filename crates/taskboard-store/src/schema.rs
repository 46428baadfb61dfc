//! Database creation and DDL for the `tasks` table.
//!
//! Both steps are idempotent. `AUTOINCREMENT` keeps ids monotonic: an id
//! freed by a delete is never handed out again, even when it was the
//! highest one.

use std::path::Path;

use rusqlite::Connection;

use crate::connection::DatabaseLocation;
use crate::errors::Result;

/// DDL for the `tasks` table.
const TASKS_SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT DEFAULT '',
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);
";

/// Step (a): make sure the database can be created at `location`.
///
/// Creates the host directory. The file itself is created by the first
/// connection.
pub fn ensure_database(location: &DatabaseLocation) -> Result<()> {
    ensure_directory(location.directory())
}

fn ensure_directory(dir: &Path) -> Result<()> {
    if !dir.as_os_str().is_empty() {
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// Step (b): create the `tasks` table if absent.
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(TASKS_SCHEMA)?;
    Ok(())
}

/// Whether the `tasks` table exists.
pub fn tasks_table_exists(conn: &Connection) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'tasks'",
        [],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}
