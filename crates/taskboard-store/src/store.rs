//! The injected store handle.
//!
//! [`TaskStore`] owns the connection pool and is cheap to clone. Every
//! operation checks one connection out of the pool for its single
//! statement and returns it on drop. Methods are blocking; async callers
//! run them on the blocking thread pool.

use std::sync::Arc;

use tracing::{debug, instrument};

use taskboard_core::{Task, TaskFields, TaskId, UpdatedTask};

use crate::connection::{
    self, ConnectionConfig, ConnectionPool, DatabaseLocation, PooledConnection,
};
use crate::errors::Result;
use crate::repository::TaskRepository;
use crate::schema;

/// Pooled handle to the task database.
#[derive(Clone)]
pub struct TaskStore {
    pool: ConnectionPool,
    location: Arc<DatabaseLocation>,
}

impl std::fmt::Debug for TaskStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskStore")
            .field("location", &self.location)
            .field("max_size", &self.pool.max_size())
            .finish_non_exhaustive()
    }
}

impl TaskStore {
    /// Build a store for `location`. No connection is opened until the
    /// first operation.
    pub fn new(location: DatabaseLocation, config: &ConnectionConfig) -> Self {
        let pool = connection::new_pool(&location, config);
        Self {
            pool,
            location: Arc::new(location),
        }
    }

    /// Where the database lives.
    pub fn location(&self) -> &DatabaseLocation {
        &self.location
    }

    /// Maximum number of simultaneous connections.
    pub fn max_connections(&self) -> u32 {
        self.pool.max_size()
    }

    fn conn(&self) -> Result<PooledConnection> {
        Ok(self.pool.get()?)
    }

    /// Create the database if absent, then the `tasks` table if absent.
    ///
    /// Idempotent. Each call is one full attempt; the caller owns retries.
    #[instrument(skip(self), fields(path = %self.location.path().display()))]
    pub fn initialize(&self) -> Result<()> {
        schema::ensure_database(&self.location)?;
        let conn = self.conn()?;
        schema::create_tables(&conn)?;
        debug!("tasks table ready");
        Ok(())
    }

    /// Whether the `tasks` table exists.
    pub fn is_initialized(&self) -> Result<bool> {
        schema::tasks_table_exists(&*self.conn()?)
    }

    /// All tasks, ordered by id.
    pub fn list_tasks(&self) -> Result<Vec<Task>> {
        TaskRepository::list_tasks(&*self.conn()?)
    }

    /// Task `id`, if present.
    pub fn get_task(&self, id: TaskId) -> Result<Option<Task>> {
        TaskRepository::get_task(&*self.conn()?, id)
    }

    /// Insert a validated task.
    pub fn create_task(&self, fields: &TaskFields) -> Result<Task> {
        TaskRepository::create_task(&*self.conn()?, fields)
    }

    /// Overwrite title and description of task `id`.
    pub fn update_task(&self, id: TaskId, fields: &TaskFields) -> Result<UpdatedTask> {
        TaskRepository::update_task(&*self.conn()?, id, fields)
    }

    /// Delete task `id`.
    pub fn delete_task(&self, id: TaskId) -> Result<()> {
        TaskRepository::delete_task(&*self.conn()?, id)
    }

    /// Number of stored tasks.
    pub fn count_tasks(&self) -> Result<i64> {
        TaskRepository::count_tasks(&*self.conn()?)
    }
}
