use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_QUEUE_CAPACITY, DEFAULT_SINK_BUFFER_SIZE,
    MAX_QUEUE_CAPACITY, MAX_SINK_BUFFER_SIZE, MIN_QUEUE_CAPACITY, MIN_SINK_BUFFER_SIZE,
};

use serde::Deserialize;

/// Message broker settings.
/// All values validated to be within reasonable operational ranges.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrokerConfig {
    /// Capacity of the inbound queue shared by all producers
    pub queue_capacity: usize,
    /// Buffer size of each per-user delivery sink created by the host
    pub sink_buffer_size: usize,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            sink_buffer_size: DEFAULT_SINK_BUFFER_SIZE,
        }
    }
}

impl BrokerConfig {
    /// Validate all fields are within acceptable ranges.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.queue_capacity < MIN_QUEUE_CAPACITY || self.queue_capacity > MAX_QUEUE_CAPACITY {
            return Err(ConfigError::broker(format!(
                "broker.queue_capacity must be {}-{}, got {}",
                MIN_QUEUE_CAPACITY, MAX_QUEUE_CAPACITY, self.queue_capacity
            )));
        }

        if self.sink_buffer_size < MIN_SINK_BUFFER_SIZE
            || self.sink_buffer_size > MAX_SINK_BUFFER_SIZE
        {
            return Err(ConfigError::broker(format!(
                "broker.sink_buffer_size must be {}-{}, got {}",
                MIN_SINK_BUFFER_SIZE, MAX_SINK_BUFFER_SIZE, self.sink_buffer_size
            )));
        }

        Ok(())
    }
}
