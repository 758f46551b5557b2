use crate::{
    BrokerConfig, BrokerError, Dispatcher, Message, Metrics, Registry, Result as BrokerResult,
    ShutdownCoordinator,
};

use std::sync::{Mutex, PoisonError};

use log::{debug, warn};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// In-process chat message broker.
///
/// Producers call [`Broker::submit`]; a single dispatch loop started by
/// [`Broker::run`] routes each message to the sinks registered through
/// [`Broker::register`]. Delivery is best-effort: a full sink or an unknown
/// recipient drops the message silently.
///
/// The broker is bound to a [`ShutdownCoordinator`] owned by the caller.
/// Triggering it stops the dispatch loop; anything still queued is abandoned.
pub struct Broker {
    inbound: mpsc::Sender<Message>,
    /// Loop state handed to the task spawned by `run`
    pending: Mutex<Option<PendingDispatch>>,
    registry: Registry,
    shutdown: ShutdownCoordinator,
    done_rx: watch::Receiver<bool>,
    metrics: Metrics,
    queue_capacity: usize,
}

struct PendingDispatch {
    inbound_rx: mpsc::Receiver<Message>,
    done_tx: watch::Sender<bool>,
}

impl Broker {
    /// Create a broker bound to `shutdown`. Dispatch does not start until `run`.
    ///
    /// A zero queue capacity is raised to one.
    pub fn new(shutdown: ShutdownCoordinator, config: BrokerConfig) -> Self {
        let queue_capacity = config.queue_capacity.max(1);
        let (inbound, inbound_rx) = mpsc::channel(queue_capacity);
        let (done_tx, done_rx) = watch::channel(false);

        Self {
            inbound,
            pending: Mutex::new(Some(PendingDispatch {
                inbound_rx,
                done_tx,
            })),
            registry: Registry::new(),
            shutdown,
            done_rx,
            metrics: Metrics::new(),
            queue_capacity,
        }
    }

    /// Spawn the dispatch loop on the current Tokio runtime.
    ///
    /// Only the first call starts a loop; later calls fail with
    /// `AlreadyRunning`.
    pub fn run(&self) -> BrokerResult<JoinHandle<()>> {
        let pending = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        let Some(PendingDispatch {
            inbound_rx,
            done_tx,
        }) = pending
        else {
            warn!("Broker::run called more than once; ignoring");
            return Err(BrokerError::already_running());
        };

        let dispatcher = Dispatcher::new(
            inbound_rx,
            self.registry.clone(),
            self.shutdown.subscribe_guard(),
            self.metrics.clone(),
            done_tx,
        );

        Ok(tokio::spawn(dispatcher.run()))
    }

    /// Enqueue a message without blocking.
    ///
    /// Fails with `Cancelled` once the lifetime has ended and with `QueueFull`
    /// when the inbound queue is at capacity. Delivery outcomes are never
    /// reported here.
    pub fn submit(&self, message: Message) -> BrokerResult<()> {
        if self.shutdown.is_shutdown() {
            self.metrics.submit_rejected("cancelled");
            return Err(BrokerError::cancelled());
        }

        match self.inbound.try_send(message) {
            Ok(()) => {
                self.metrics.message_submitted();
                Ok(())
            }
            Err(TrySendError::Full(message)) => {
                debug!(
                    "Inbound queue full ({}), rejecting message from {}",
                    self.queue_capacity, message.sender
                );
                self.metrics.submit_rejected("queue_full");
                Err(BrokerError::queue_full(self.queue_capacity))
            }
            Err(TrySendError::Closed(_)) => {
                self.metrics.submit_rejected("cancelled");
                Err(BrokerError::cancelled())
            }
        }
    }

    /// Route messages for `user_id` to `sink`, replacing any previous sink.
    ///
    /// The broker only drops its own handle, on replacement and on
    /// `unregister`. A consumer sees end-of-stream once every sender of its
    /// channel is gone, so `sink` must be the caller's only sender if the
    /// caller relies on the stream ending. Use [`Broker::register_channel`]
    /// to have the broker own the sending side.
    pub async fn register(&self, user_id: impl Into<String>, sink: mpsc::Sender<Message>) {
        let replaced = self.registry.register(user_id.into(), sink).await;
        self.metrics.user_registered(replaced);
    }

    /// Create a sink of `capacity` for `user_id` and register it, returning
    /// the consuming end.
    ///
    /// The broker holds the only sender: `unregister`, or registering the same
    /// user again, ends this stream.
    pub async fn register_channel(
        &self,
        user_id: impl Into<String>,
        capacity: usize,
    ) -> mpsc::Receiver<Message> {
        let (sink, stream) = mpsc::channel(capacity.max(1));
        self.register(user_id, sink).await;
        stream
    }

    /// Stop routing to `user_id` and drop the broker's sender for it. No-op if
    /// absent.
    pub async fn unregister(&self, user_id: &str) {
        if self.registry.unregister(user_id).await {
            self.metrics.user_unregistered();
        }
    }

    /// Wait until the dispatch loop has fully exited.
    ///
    /// Never completes if `run` was not called.
    pub async fn wait_done(&self) {
        let mut done_rx = self.done_rx.clone();
        // Err means the loop task went away without signalling; treat as done.
        let _ = done_rx.wait_for(|done| *done).await;
    }

    /// Whether the dispatch loop has exited
    pub fn is_done(&self) -> bool {
        *self.done_rx.borrow()
    }

    pub fn is_cancelled(&self) -> bool {
        self.shutdown.is_shutdown()
    }

    /// Messages currently waiting in the inbound queue
    pub fn queued(&self) -> usize {
        self.inbound.max_capacity() - self.inbound.capacity()
    }

    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }

    pub async fn registered_count(&self) -> usize {
        self.registry.len().await
    }

    pub async fn is_registered(&self, user_id: &str) -> bool {
        self.registry.contains(user_id).await
    }

    /// Registered user ids, sorted
    pub async fn registered_users(&self) -> Vec<String> {
        self.registry.user_ids().await
    }
}
