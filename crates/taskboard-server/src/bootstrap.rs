//! Background schema initialization.
//!
//! [`SchemaBootstrap`] creates the database and the `tasks` table, retrying
//! on a fixed interval until it succeeds or its token is cancelled. Progress
//! is published on a `watch` channel so the health endpoint can report it.
//! The listener never waits on this task.

use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use taskboard_store::{StoreError, TaskStore};

use crate::metrics::{SCHEMA_BOOTSTRAP_ATTEMPTS_TOTAL, SCHEMA_READY};

/// Default delay between failed attempts.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(5);

/// Progress of schema initialization.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum SchemaState {
    /// No attempt has finished yet.
    Pending,
    /// Database and table exist.
    Ready,
    /// The latest attempt failed; another is scheduled.
    Failed {
        /// Attempts made so far.
        attempts: u32,
        /// Error from the latest attempt.
        last_error: String,
    },
}

impl SchemaState {
    /// Short label for health output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Ready => "ready",
            Self::Failed { .. } => "failed",
        }
    }

    /// Whether the schema is ready.
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// Initializes the schema in the background.
#[derive(Debug)]
pub struct SchemaBootstrap {
    store: TaskStore,
    retry_interval: Duration,
    state: watch::Sender<SchemaState>,
}

impl SchemaBootstrap {
    /// Create a bootstrap for `store` and a receiver for its state.
    pub fn new(
        store: TaskStore,
        retry_interval: Duration,
    ) -> (Self, watch::Receiver<SchemaState>) {
        let (state, rx) = watch::channel(SchemaState::Pending);
        metrics::gauge!(SCHEMA_READY).set(0.0);
        (
            Self {
                store,
                retry_interval,
                state,
            },
            rx,
        )
    }

    /// A new receiver for the state channel.
    pub fn subscribe(&self) -> watch::Receiver<SchemaState> {
        self.state.subscribe()
    }

    /// Run on the tokio runtime until ready or cancelled.
    pub fn spawn(self, token: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(token))
    }

    /// Attempt initialization until it succeeds or `token` is cancelled.
    ///
    /// A running attempt is not interrupted; cancellation is observed
    /// between attempts.
    pub async fn run(self, token: CancellationToken) {
        let mut attempts: u32 = 0;
        loop {
            if token.is_cancelled() {
                info!(attempts, "schema bootstrap cancelled");
                return;
            }
            attempts = attempts.saturating_add(1);
            metrics::counter!(SCHEMA_BOOTSTRAP_ATTEMPTS_TOTAL).increment(1);

            match self.attempt().await {
                Ok(()) => {
                    info!(
                        attempts,
                        path = %self.store.location().path().display(),
                        "database schema ready"
                    );
                    metrics::gauge!(SCHEMA_READY).set(1.0);
                    let _ = self.state.send_replace(SchemaState::Ready);
                    return;
                }
                Err(e) => {
                    let retry_in_ms =
                        u64::try_from(self.retry_interval.as_millis()).unwrap_or(u64::MAX);
                    warn!(
                        attempt = attempts,
                        error = %e,
                        retry_in_ms,
                        "schema initialization failed, retrying"
                    );
                    let _ = self.state.send_replace(SchemaState::Failed {
                        attempts,
                        last_error: e.to_string(),
                    });
                }
            }

            tokio::select! {
                () = token.cancelled() => {
                    info!(attempts, "schema bootstrap cancelled");
                    return;
                }
                () = tokio::time::sleep(self.retry_interval) => {}
            }
        }
    }

    async fn attempt(&self) -> Result<(), StoreError> {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || store.initialize())
            .await
            .map_err(|e| StoreError::Internal(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use taskboard_store::{ConnectionConfig, DatabaseLocation};

    use super::*;

    fn store_at(location: DatabaseLocation) -> TaskStore {
        let config = ConnectionConfig {
            pool_size: 2,
            connection_timeout: Duration::from_millis(500),
            ..ConnectionConfig::default()
        };
        TaskStore::new(location, &config)
    }

    async fn wait_until<F>(rx: &mut watch::Receiver<SchemaState>, pred: F) -> SchemaState
    where
        F: Fn(&SchemaState) -> bool,
    {
        tokio::time::timeout(Duration::from_secs(10), rx.wait_for(|s| pred(s)))
            .await
            .unwrap()
            .unwrap()
            .clone()
    }

    #[test]
    fn labels() {
        assert_eq!(SchemaState::Pending.label(), "pending");
        assert_eq!(SchemaState::Ready.label(), "ready");
        let failed = SchemaState::Failed {
            attempts: 2,
            last_error: "x".into(),
        };
        assert_eq!(failed.label(), "failed");
        assert!(!failed.is_ready());
        assert!(SchemaState::Ready.is_ready());
    }

    #[test]
    fn failed_state_serializes_with_tag() {
        let failed = SchemaState::Failed {
            attempts: 3,
            last_error: "boom".into(),
        };
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["state"], "failed");
        assert_eq!(json["attempts"], 3);
        assert_eq!(json["last_error"], "boom");
    }

    #[tokio::test]
    async fn reaches_ready_on_first_attempt() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(DatabaseLocation::new(dir.path().join("db"), "tasksdb"));
        let (bootstrap, mut rx) = SchemaBootstrap::new(store.clone(), Duration::from_millis(20));
        assert_eq!(*rx.borrow(), SchemaState::Pending);

        let handle = bootstrap.spawn(CancellationToken::new());
        let _ = wait_until(&mut rx, SchemaState::is_ready).await;
        handle.await.unwrap();
        assert!(store.is_initialized().unwrap());
    }

    #[tokio::test]
    async fn retries_until_location_is_usable() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocked");
        std::fs::write(&blocker, b"x").unwrap();
        let store = store_at(DatabaseLocation::new(&blocker, "tasksdb"));
        let (bootstrap, mut rx) = SchemaBootstrap::new(store, Duration::from_millis(20));
        let handle = bootstrap.spawn(CancellationToken::new());

        let failed = wait_until(&mut rx, |s| {
            matches!(s, SchemaState::Failed { attempts, .. } if *attempts >= 2)
        })
        .await;
        assert_eq!(failed.label(), "failed");

        std::fs::remove_file(&blocker).unwrap();
        let _ = wait_until(&mut rx, SchemaState::is_ready).await;
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn subscriber_observes_ready() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(DatabaseLocation::new(dir.path().join("db"), "tasksdb"));
        let (bootstrap, rx) = SchemaBootstrap::new(store, Duration::from_millis(20));
        drop(rx);
        let mut subscriber = bootstrap.subscribe();
        assert_eq!(*subscriber.borrow(), SchemaState::Pending);

        let handle = bootstrap.spawn(CancellationToken::new());
        let state = wait_until(&mut subscriber, SchemaState::is_ready).await;
        assert_eq!(state, SchemaState::Ready);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn cancellation_stops_retries() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocked");
        std::fs::write(&blocker, b"x").unwrap();
        let store = store_at(DatabaseLocation::new(&blocker, "tasksdb"));
        let (bootstrap, mut rx) = SchemaBootstrap::new(store, Duration::from_secs(3600));
        let token = CancellationToken::new();
        let handle = bootstrap.spawn(token.clone());

        let _ = wait_until(&mut rx, |s| matches!(s, SchemaState::Failed { .. })).await;
        token.cancel();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
        assert!(!rx.borrow().is_ready());
    }

    #[tokio::test]
    async fn cancelled_before_start_makes_no_attempt() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(DatabaseLocation::new(dir.path().join("db"), "tasksdb"));
        let (bootstrap, rx) = SchemaBootstrap::new(store, Duration::from_millis(20));
        let token = CancellationToken::new();
        token.cancel();
        bootstrap.run(token).await;
        assert_eq!(*rx.borrow(), SchemaState::Pending);
        assert!(!dir.path().join("db").exists());
    }
}
