use crate::ShutdownCoordinator;

use tokio::sync::watch;

/// Helper for waiting on shutdown inside async tasks
pub struct ShutdownGuard {
    shutdown_rx: watch::Receiver<bool>,
}

impl ShutdownGuard {
    pub fn new(coordinator: &ShutdownCoordinator) -> Self {
        Self {
            shutdown_rx: coordinator.subscribe(),
        }
    }

    /// Wait for shutdown signal. Cancel-safe.
    ///
    /// If every coordinator is dropped without triggering shutdown, this never
    /// completes: dropping the lifetime is not the same as cancelling it.
    pub async fn wait(&mut self) {
        if self.shutdown_rx.wait_for(|triggered| *triggered).await.is_err() {
            std::future::pending::<()>().await;
        }
    }

    /// Poll for shutdown signal (non-blocking)
    pub fn poll_shutdown(&self) -> bool {
        *self.shutdown_rx.borrow()
    }
}
