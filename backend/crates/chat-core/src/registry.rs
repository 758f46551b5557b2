use crate::{DeliveryReport, Message};

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, info};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{RwLock, mpsc};

/// Registry mapping user identity to that user's delivery sink.
///
/// Writers (register/unregister) take the exclusive lock. Delivery takes the
/// shared lock and holds it across every `try_send`, so a send can never race
/// with the removal of the same sink.
pub struct Registry {
    inner: Arc<RwLock<RegistryInner>>,
}

struct RegistryInner {
    /// Delivery sink per user
    sinks: HashMap<String, mpsc::Sender<Message>>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(RegistryInner {
                sinks: HashMap::new(),
            })),
        }
    }

    /// Insert or replace the sink for `user_id`. Returns true if a previous
    /// sink was replaced.
    ///
    /// The replaced sender is released, not explicitly closed: its consumer
    /// only sees end-of-stream once every other clone of that sender is gone.
    pub async fn register(&self, user_id: String, sink: mpsc::Sender<Message>) -> bool {
        let mut inner = self.inner.write().await;

        let replaced = inner.sinks.insert(user_id.clone(), sink).is_some();
        if replaced {
            debug!("Replaced sink for user {user_id}");
        }
        info!(
            "Registered user {user_id} ({} total)",
            inner.sinks.len()
        );

        replaced
    }

    /// Remove the sink for `user_id` and drop it. The stream ends here unless
    /// the caller kept another sender. Returns false if the user was not
    /// registered.
    pub async fn unregister(&self, user_id: &str) -> bool {
        let mut inner = self.inner.write().await;

        match inner.sinks.remove(user_id) {
            Some(sink) => {
                drop(sink);
                info!(
                    "Unregistered user {user_id} ({} total remaining)",
                    inner.sinks.len()
                );
                true
            }
            None => false,
        }
    }

    /// Deliver a private message to `message.recipient`.
    pub async fn deliver(&self, message: &Message) -> DeliveryReport {
        let inner = self.inner.read().await;

        let Some(sink) = inner.sinks.get(&message.recipient) else {
            debug!(
                "No sink registered for {}, dropping message from {}",
                message.recipient, message.sender
            );
            return DeliveryReport::unknown_recipient();
        };

        let mut report = DeliveryReport::default();
        Self::try_deliver(&message.recipient, sink, message, &mut report);
        report
    }

    /// Deliver a message to every registered sink. A full or closed sink only
    /// affects its own user.
    pub async fn broadcast(&self, message: &Message) -> DeliveryReport {
        let inner = self.inner.read().await;

        let mut report = DeliveryReport::default();
        for (user_id, sink) in inner.sinks.iter() {
            Self::try_deliver(user_id, sink, message, &mut report);
        }
        report
    }

    fn try_deliver(
        user_id: &str,
        sink: &mpsc::Sender<Message>,
        message: &Message,
        report: &mut DeliveryReport,
    ) {
        match sink.try_send(message.clone()) {
            Ok(()) => report.delivered += 1,
            Err(TrySendError::Full(_)) => {
                debug!("Sink for user {user_id} is full, dropping message");
                report.full += 1;
            }
            Err(TrySendError::Closed(_)) => {
                debug!("Sink for user {user_id} is closed, dropping message");
                report.closed += 1;
            }
        }
    }

    pub async fn contains(&self, user_id: &str) -> bool {
        let inner = self.inner.read().await;
        inner.sinks.contains_key(user_id)
    }

    pub async fn len(&self) -> usize {
        let inner = self.inner.read().await;
        inner.sinks.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Registered user ids, sorted
    pub async fn user_ids(&self) -> Vec<String> {
        let inner = self.inner.read().await;
        let mut ids: Vec<String> = inner.sinks.keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Registry {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
