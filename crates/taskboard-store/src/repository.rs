//! SQL data access for the `tasks` table.
//!
//! All functions take a `&Connection` and run a single statement, so each
//! call is atomic on its own. Update and delete decide existence from the
//! affected-row count; there is no read before the write.

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

use taskboard_core::{Task, TaskFields, TaskId, UpdatedTask};

use crate::errors::{Result, StoreError};

const SELECT_COLUMNS: &str = "id, title, COALESCE(description, ''), created_at";

/// Raw row from the `tasks` table, before timestamp parsing.
#[derive(Clone, Debug)]
struct TaskRow {
    id: TaskId,
    title: String,
    description: String,
    created_at: String,
}

impl TaskRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            created_at: row.get(3)?,
        })
    }

    fn into_task(self) -> Result<Task> {
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| StoreError::CorruptRow {
                table: "tasks",
                column: "created_at",
                detail: format!("{}: {e}", self.created_at),
            })?
            .with_timezone(&Utc);
        Ok(Task {
            id: self.id,
            title: self.title,
            description: self.description,
            created_at,
        })
    }
}

/// Task repository for SQL CRUD operations.
pub struct TaskRepository;

impl TaskRepository {
    /// All tasks in id (insertion) order.
    pub fn list_tasks(conn: &Connection) -> Result<Vec<Task>> {
        let mut stmt = conn.prepare(&format!("SELECT {SELECT_COLUMNS} FROM tasks ORDER BY id"))?;
        let rows = stmt
            .query_map([], TaskRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(TaskRow::into_task).collect()
    }

    /// Get a task by id.
    pub fn get_task(conn: &Connection, id: TaskId) -> Result<Option<Task>> {
        let row = conn
            .query_row(
                &format!("SELECT {SELECT_COLUMNS} FROM tasks WHERE id = ?1"),
                params![id],
                TaskRow::from_row,
            )
            .optional()?;
        row.map(TaskRow::into_task).transpose()
    }

    /// Insert a task. The store assigns `id` and `created_at`.
    pub fn create_task(conn: &Connection, fields: &TaskFields) -> Result<Task> {
        let row = conn.query_row(
            &format!(
                "INSERT INTO tasks (title, description) VALUES (?1, ?2) \
                 RETURNING {SELECT_COLUMNS}"
            ),
            params![fields.title, fields.description],
            TaskRow::from_row,
        )?;
        row.into_task()
    }

    /// Overwrite title and description of task `id`.
    pub fn update_task(conn: &Connection, id: TaskId, fields: &TaskFields) -> Result<UpdatedTask> {
        let changed = conn.execute(
            "UPDATE tasks SET title = ?1, description = ?2 WHERE id = ?3",
            params![fields.title, fields.description, id],
        )?;
        if changed == 0 {
            return Err(StoreError::TaskNotFound(id));
        }
        Ok(UpdatedTask {
            id,
            title: fields.title.clone(),
            description: fields.description.clone(),
        })
    }

    /// Delete task `id`.
    pub fn delete_task(conn: &Connection, id: TaskId) -> Result<()> {
        let changed = conn.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(StoreError::TaskNotFound(id));
        }
        Ok(())
    }

    /// Number of rows in `tasks`.
    pub fn count_tasks(conn: &Connection) -> Result<i64> {
        Ok(conn.query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0))?)
    }
}
