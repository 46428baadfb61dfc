//! `taskboard tasks …`: the terminal front end of the client.

use std::io::Write;

use anyhow::{Context, Result, bail};

use taskboard_client::{ApiClient, TaskBoard};
use taskboard_core::Task;
use taskboard_settings::TaskboardSettings;

use crate::cli::{TaskAction, TasksArgs};

/// Run one client action and print its result to stdout.
pub async fn run(settings: &TaskboardSettings, args: TasksArgs) -> Result<()> {
    let api_url = args.api_url.unwrap_or_else(|| settings.client.api_url.clone());
    let api = ApiClient::new(api_url);
    let mut out = std::io::stdout().lock();

    match args.action {
        TaskAction::Health => {
            let health = api.health().await.context("Failed to reach server")?;
            writeln!(
                out,
                "{} (schema: {}, uptime: {}s)",
                health.status,
                health.schema.as_deref().unwrap_or("unknown"),
                health.uptime_secs.unwrap_or(0)
            )?;
        }
        TaskAction::List => {
            let mut board = TaskBoard::new(api);
            board.refresh().await.context("Failed to fetch tasks")?;
            print_tasks(&mut out, board.tasks(), args.json)?;
        }
        TaskAction::Show { id } => {
            let task = api.get_task(id).await.context("Failed to fetch task")?;
            print_tasks(&mut out, std::slice::from_ref(&task), args.json)?;
        }
        TaskAction::Add { title, description } => {
            let mut board = TaskBoard::new(api);
            *board.draft_mut() = taskboard_client::Draft { title, description };
            let created = board.submit_draft().await.context("Failed to create task")?;
            let Some(task) = created else {
                bail!("{}", board.error().unwrap_or("Title is required"));
            };
            print_tasks(&mut out, std::slice::from_ref(&task), args.json)?;
        }
        TaskAction::Edit { id, title, description } => {
            let mut board = TaskBoard::new(api);
            board.refresh().await.context("Failed to fetch tasks")?;
            if !board.begin_edit(id) {
                bail!("Task not found");
            }
            if let Some(edit) = board.editing_mut() {
                if let Some(title) = title {
                    edit.title = title;
                }
                if let Some(description) = description {
                    edit.description = description;
                }
            }
            board.save_edit().await.context("Failed to update task")?;
            if let Some(task) = board.tasks().iter().find(|t| t.id == id) {
                print_tasks(&mut out, std::slice::from_ref(task), args.json)?;
            }
        }
        TaskAction::Rm { id } => {
            let mut board = TaskBoard::new(api);
            board.delete(id).await.context("Failed to delete task")?;
            writeln!(out, "deleted {id}")?;
        }
    }
    Ok(())
}

/// One task per line: `id`, `title`, `description`, `created_at`, tab-separated.
fn print_tasks(out: &mut impl Write, tasks: &[Task], json: bool) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, tasks)?;
        writeln!(out)?;
        return Ok(());
    }
    for task in tasks {
        writeln!(
            out,
            "{}\t{}\t{}\t{}",
            task.id,
            task.title,
            task.description,
            task.created_at.to_rfc3339()
        )?;
    }
    Ok(())
}
