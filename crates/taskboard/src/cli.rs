//! Command-line interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use taskboard_core::TaskId;

/// Task management REST API and terminal client.
#[derive(Parser, Debug)]
#[command(name = "taskboard", version, about = "Task management REST API and terminal client")]
pub struct Cli {
    /// JSON settings file (defaults to `$TASKBOARD_SETTINGS`).
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Defaults to `serve`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// The subcommand, `serve` when none was given.
    pub fn into_command(self) -> Command {
        self.command.unwrap_or(Command::Serve(ServeArgs::default()))
    }
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the API server.
    Serve(ServeArgs),
    /// Call a running API server.
    Tasks(TasksArgs),
}

/// `taskboard serve` flags. Unset flags fall back to settings.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Host to bind.
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind (0 for auto-assign).
    #[arg(long)]
    pub port: Option<u16>,
}

/// `taskboard tasks` flags.
#[derive(Args, Debug)]
pub struct TasksArgs {
    /// API base URL (overrides `API_URL`).
    #[arg(long)]
    pub api_url: Option<String>,

    /// Print JSON instead of tab-separated lines.
    #[arg(long)]
    pub json: bool,

    /// What to do.
    #[command(subcommand)]
    pub action: TaskAction,
}

/// Client actions.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum TaskAction {
    /// Show server health.
    Health,
    /// List all tasks.
    List,
    /// Show one task.
    Show {
        /// Task id.
        id: TaskId,
    },
    /// Create a task.
    Add {
        /// Title (required, non-blank).
        title: String,
        /// Description.
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Change a task's title and/or description.
    Edit {
        /// Task id.
        id: TaskId,
        /// New title.
        #[arg(long)]
        title: Option<String>,
        /// New description.
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Delete a task.
    Rm {
        /// Task id.
        id: TaskId,
    },
}
