use crate::DeliveryReport;

use metrics::{counter, gauge, histogram};

/// Metrics collector for broker operations
#[derive(Clone)]
pub struct Metrics {
    prefix: &'static str,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            prefix: "chat_broker",
        }
    }

    /// Record message accepted into the inbound queue
    pub fn message_submitted(&self) {
        counter!(format!("{}.messages.submitted", self.prefix)).increment(1);
    }

    /// Record submit rejected before enqueue
    pub fn submit_rejected(&self, reason: &str) {
        counter!(format!("{}.messages.rejected", self.prefix)).increment(1);
        counter!(format!("{}.messages.rejected.{}", self.prefix, reason)).increment(1);
    }

    /// Record the outcome of one dispatched message
    pub fn message_dispatched(&self, kind: &str, report: &DeliveryReport) {
        counter!(format!("{}.messages.dispatched.{}", self.prefix, kind)).increment(1);
        counter!(format!("{}.deliveries.succeeded", self.prefix)).increment(report.delivered as u64);
        if report.full > 0 {
            counter!(format!("{}.deliveries.dropped.sink_full", self.prefix))
                .increment(report.full as u64);
        }
        if report.closed > 0 {
            counter!(format!("{}.deliveries.dropped.sink_closed", self.prefix))
                .increment(report.closed as u64);
        }
        if report.unknown_recipient {
            counter!(format!("{}.deliveries.dropped.unknown_recipient", self.prefix)).increment(1);
        }
    }

    /// Record user sink registered
    pub fn user_registered(&self, replaced: bool) {
        counter!(format!("{}.users.registered", self.prefix)).increment(1);
        if replaced {
            counter!(format!("{}.users.replaced", self.prefix)).increment(1);
        } else {
            gauge!(format!("{}.users.active", self.prefix)).increment(1.0);
        }
    }

    /// Record user sink removed
    pub fn user_unregistered(&self) {
        counter!(format!("{}.users.unregistered", self.prefix)).increment(1);
        gauge!(format!("{}.users.active", self.prefix)).decrement(1.0);
    }

    /// Record dispatch latency for one message
    pub fn dispatch_latency(&self, duration: std::time::Duration) {
        histogram!(format!("{}.dispatch.latency_us", self.prefix))
            .record(duration.as_micros() as f64);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
