//! # taskboard
//!
//! Taskboard binary. `taskboard serve` wires the store, the schema
//! bootstrap, and the HTTP server together; `taskboard tasks …` talks to a
//! running server.

#![deny(unsafe_code)]

mod cli;
mod tasks;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use taskboard_server::{SchemaBootstrap, ServerConfig, TaskServer};
use taskboard_settings::TaskboardSettings;
use taskboard_store::{ConnectionConfig, DatabaseLocation, TaskStore};

use crate::cli::{Cli, Command, ServeArgs};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = match cli.settings.as_deref() {
        Some(path) => taskboard_settings::load_settings_from_path(path),
        None => taskboard_settings::load_settings(),
    }
    .context("Failed to load settings")?;

    taskboard_core::logging::init_subscriber(&settings.logging.level, settings.logging.format);

    match cli.into_command() {
        Command::Serve(args) => serve(&settings, args).await,
        Command::Tasks(args) => tasks::run(&settings, args).await,
    }
}

/// Store handle for the configured database.
fn build_store(settings: &TaskboardSettings) -> TaskStore {
    let db = &settings.database;
    let config = ConnectionConfig {
        pool_size: db.pool_size,
        connection_timeout: Duration::from_secs(db.pool_timeout_secs),
        ..ConnectionConfig::default()
    };
    TaskStore::new(DatabaseLocation::new(&db.host, &db.name), &config)
}

/// Listener config: CLI flags override settings.
fn server_config(settings: &TaskboardSettings, args: ServeArgs) -> ServerConfig {
    ServerConfig {
        host: args.host.unwrap_or_else(|| settings.server.host.clone()),
        port: args.port.unwrap_or(settings.server.port),
    }
}

async fn serve(settings: &TaskboardSettings, args: ServeArgs) -> Result<()> {
    let db = &settings.database;
    tracing::info!(
        db_host = %db.host,
        db_user = %db.user,
        db_name = %db.name,
        pool_size = db.pool_size,
        "starting taskboard"
    );

    let metrics = taskboard_server::metrics::install_recorder()
        .context("Failed to install metrics recorder")?;

    let store = build_store(settings);
    let (bootstrap, schema) =
        SchemaBootstrap::new(store.clone(), Duration::from_millis(db.init_retry_ms));

    let server =
        TaskServer::new(server_config(settings, args), store, schema).with_metrics(metrics);
    let shutdown = server.shutdown().clone();

    // Schema init runs beside the listener; neither waits for the other.
    let _bootstrap = bootstrap.spawn(shutdown.token());

    let (addr, _handle) = server.listen().await.context("Failed to bind server")?;
    tracing::info!("taskboard listening on http://{addr}");

    shutdown
        .wait_for_signal()
        .await
        .context("Failed to listen for shutdown signals")?;

    tracing::info!("shutting down");
    Ok(())
}
