//! Client-side view state.
//!
//! [`TaskBoard`] never patches its list locally. Every successful create,
//! update, or delete is followed by a fresh list call, so the server stays
//! the only source of truth. A failed action sets one message and is not
//! retried.

use tracing::warn;

use taskboard_core::{Task, TaskId, TaskInput};

use crate::api::{ApiClient, ClientError};

const FETCH_FAILED: &str = "Failed to fetch tasks";
const CREATE_FAILED: &str = "Failed to create task";
const UPDATE_FAILED: &str = "Failed to update task";
const DELETE_FAILED: &str = "Failed to delete task";
const TITLE_REQUIRED: &str = "Title is required";

/// New-task form contents.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Draft {
    /// Title being typed.
    pub title: String,
    /// Description being typed.
    pub description: String,
}

/// An in-progress edit of one task.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditState {
    /// Task being edited.
    pub id: TaskId,
    /// Edited title.
    pub title: String,
    /// Edited description.
    pub description: String,
}

/// Last-fetched tasks plus the local draft and edit.
#[derive(Debug)]
pub struct TaskBoard {
    api: ApiClient,
    tasks: Vec<Task>,
    draft: Draft,
    editing: Option<EditState>,
    error: Option<String>,
}

impl TaskBoard {
    /// Empty board over `api`. Call [`refresh`](Self::refresh) to load.
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            tasks: Vec::new(),
            draft: Draft::default(),
            editing: None,
            error: None,
        }
    }

    /// Tasks from the last successful list call.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// The new-task draft.
    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    /// Mutable access to the draft.
    pub fn draft_mut(&mut self) -> &mut Draft {
        &mut self.draft
    }

    /// The edit in progress, if any.
    pub fn editing(&self) -> Option<&EditState> {
        self.editing.as_ref()
    }

    /// Mutable access to the edit in progress.
    pub fn editing_mut(&mut self) -> Option<&mut EditState> {
        self.editing.as_mut()
    }

    /// Message from the last failed action.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Reload the list from the server.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        match self.api.list_tasks().await {
            Ok(tasks) => {
                self.tasks = tasks;
                self.error = None;
                Ok(())
            }
            Err(e) => Err(self.fail(FETCH_FAILED, e)),
        }
    }

    /// Create a task from the draft, clear the draft, and resync.
    ///
    /// A blank title is rejected without a request.
    pub async fn submit_draft(&mut self) -> Result<Option<Task>, ClientError> {
        if self.draft.title.trim().is_empty() {
            self.error = Some(TITLE_REQUIRED.to_owned());
            return Ok(None);
        }
        let input = TaskInput::new(self.draft.title.clone(), self.draft.description.clone());
        let created = match self.api.create_task(&input).await {
            Ok(task) => task,
            Err(e) => return Err(self.fail(CREATE_FAILED, e)),
        };
        self.draft = Draft::default();
        self.refresh().await?;
        Ok(Some(created))
    }

    /// Start editing task `id` with its current values. Returns `false` if
    /// the task is not in the list.
    pub fn begin_edit(&mut self, id: TaskId) -> bool {
        let Some(task) = self.tasks.iter().find(|t| t.id == id) else {
            return false;
        };
        self.editing = Some(EditState {
            id,
            title: task.title.clone(),
            description: task.description.clone(),
        });
        true
    }

    /// Drop the edit in progress.
    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Send the edit in progress, end editing, and resync.
    pub async fn save_edit(&mut self) -> Result<(), ClientError> {
        let Some(edit) = self.editing.clone() else {
            return Ok(());
        };
        let input = TaskInput::new(edit.title, edit.description);
        if let Err(e) = self.api.update_task(edit.id, &input).await {
            return Err(self.fail(UPDATE_FAILED, e));
        }
        self.editing = None;
        self.refresh().await
    }

    /// Delete task `id` and resync.
    pub async fn delete(&mut self, id: TaskId) -> Result<(), ClientError> {
        if let Err(e) = self.api.delete_task(id).await {
            return Err(self.fail(DELETE_FAILED, e));
        }
        if self.editing.as_ref().is_some_and(|edit| edit.id == id) {
            self.editing = None;
        }
        self.refresh().await
    }

    fn fail(&mut self, message: &str, error: ClientError) -> ClientError {
        warn!(error = %error, "{message}");
        self.error = Some(message.to_owned());
        error
    }
}
