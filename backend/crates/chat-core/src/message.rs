use chrono::Utc;
use serde::{Deserialize, Serialize};

/// A chat message routed by the broker.
///
/// `recipient` is only consulted when `broadcast` is false. A `timestamp` of
/// zero means "unset"; the dispatch loop stamps such messages with the current
/// time (seconds since the Unix epoch) before delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: String,
    #[serde(default)]
    pub recipient: String,
    pub content: String,
    #[serde(default)]
    pub broadcast: bool,
    #[serde(default)]
    pub timestamp: i64,
}

impl Message {
    /// Message for every registered user
    pub fn broadcast(sender: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            recipient: String::new(),
            content: content.into(),
            broadcast: true,
            timestamp: 0,
        }
    }

    /// Message for exactly one recipient
    pub fn private(
        sender: impl Into<String>,
        recipient: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            content: content.into(),
            broadcast: false,
            timestamp: 0,
        }
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn has_timestamp(&self) -> bool {
        self.timestamp != 0
    }

    /// Assign the current time if the timestamp is unset.
    pub(crate) fn stamp_if_unset(&mut self) {
        if !self.has_timestamp() {
            self.timestamp = Utc::now().timestamp();
        }
    }
}
