use crate::{Message, Metrics, MetricsTimer, Registry, ShutdownGuard};

use log::{debug, info};
use tokio::sync::{mpsc, watch};

/// The single background loop that drains the inbound queue.
pub(crate) struct Dispatcher {
    inbound: mpsc::Receiver<Message>,
    registry: Registry,
    shutdown: ShutdownGuard,
    metrics: Metrics,
    done: watch::Sender<bool>,
}

impl Dispatcher {
    pub(crate) fn new(
        inbound: mpsc::Receiver<Message>,
        registry: Registry,
        shutdown: ShutdownGuard,
        metrics: Metrics,
        done: watch::Sender<bool>,
    ) -> Self {
        Self {
            inbound,
            registry,
            shutdown,
            metrics,
            done,
        }
    }

    /// Run until shutdown is observed or every producer handle is gone.
    /// Messages still queued at shutdown are abandoned.
    pub(crate) async fn run(mut self) {
        info!("Dispatch loop started");

        loop {
            tokio::select! {
                biased;

                _ = self.shutdown.wait() => {
                    info!(
                        "Dispatch loop observed shutdown ({} queued message(s) abandoned)",
                        self.inbound.len()
                    );
                    break;
                }

                next = self.inbound.recv() => match next {
                    Some(message) => self.dispatch(message).await,
                    None => {
                        info!("Inbound queue closed, dispatch loop exiting");
                        break;
                    }
                },
            }
        }

        self.done.send_replace(true);
        info!("Dispatch loop stopped");
    }

    async fn dispatch(&self, mut message: Message) {
        let timer = MetricsTimer::new(self.metrics.clone());

        message.stamp_if_unset();

        let (kind, report) = if message.broadcast {
            ("broadcast", self.registry.broadcast(&message).await)
        } else {
            ("private", self.registry.deliver(&message).await)
        };

        debug!(
            "Dispatched {kind} message from {}: {} delivered, {} dropped",
            message.sender,
            report.delivered,
            report.dropped()
        );

        self.metrics.message_dispatched(kind, &report);
        timer.finish();
    }
}
