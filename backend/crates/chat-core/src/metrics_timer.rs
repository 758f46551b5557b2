use crate::Metrics;

use std::time::Instant;

/// Times a single dispatch
pub struct MetricsTimer {
    start: Instant,
    metrics: Metrics,
}

impl MetricsTimer {
    pub fn new(metrics: Metrics) -> Self {
        Self {
            start: Instant::now(),
            metrics,
        }
    }

    pub fn finish(self) {
        self.metrics.dispatch_latency(self.start.elapsed());
    }
}
