use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BrokerError {
    #[error("Broker lifetime has ended {location}")]
    Cancelled { location: ErrorLocation },

    #[error("Inbound queue is full (capacity {capacity}) {location}")]
    QueueFull {
        capacity: usize,
        location: ErrorLocation,
    },

    #[error("Dispatch loop is already running {location}")]
    AlreadyRunning { location: ErrorLocation },
}

impl BrokerError {
    #[track_caller]
    pub fn cancelled() -> Self {
        Self::Cancelled {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn queue_full(capacity: usize) -> Self {
        Self::QueueFull {
            capacity,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn already_running() -> Self {
        Self::AlreadyRunning {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Stable code for surrounding transports to put on the wire
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Cancelled { .. } => "CANCELLED",
            Self::QueueFull { .. } => "QUEUE_FULL",
            Self::AlreadyRunning { .. } => "ALREADY_RUNNING",
        }
    }

    /// Whether retrying the same call later can succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::QueueFull { .. })
    }
}

pub type Result<T> = std::result::Result<T, BrokerError>;
