//! Shutdown coordination via `CancellationToken`.
//!
//! There is no in-flight drain. A signal cancels the token, which stops the
//! schema bootstrap and the listener, and the process exits.

use tokio_util::sync::CancellationToken;
use tracing::info;

/// Coordinates shutdown across the server tasks.
#[derive(Debug)]
pub struct ShutdownCoordinator {
    token: CancellationToken,
}

impl ShutdownCoordinator {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    /// Get a clone of the cancellation token.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Initiate shutdown.
    pub fn shutdown(&self) {
        self.token.cancel();
    }

    /// Whether a shutdown has been initiated.
    pub fn is_shutting_down(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Wait for SIGINT or SIGTERM, or for shutdown to be initiated
    /// elsewhere, then cancel the token.
    pub async fn wait_for_signal(&self) -> std::io::Result<()> {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result?;
                info!("received SIGINT");
            }
            result = terminate() => {
                result?;
                info!("received SIGTERM");
            }
            () = self.token.cancelled() => {}
        }
        self.shutdown();
        Ok(())
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
async fn terminate() -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};
    let _ = signal(SignalKind::terminate())?.recv().await;
    Ok(())
}

#[cfg(not(unix))]
async fn terminate() -> std::io::Result<()> {
    std::future::pending().await
}
