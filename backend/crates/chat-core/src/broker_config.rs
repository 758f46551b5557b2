/// Runtime configuration for a broker instance
#[derive(Debug, Clone)]
pub struct BrokerConfig {
    /// Inbound queue capacity shared by all producers (bounded to surface backpressure)
    pub queue_capacity: usize,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 100,
        }
    }
}
