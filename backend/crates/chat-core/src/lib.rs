//! In-process chat message broker.
//!
//! Producers submit [`Message`]s into a bounded inbound queue; a single
//! dispatch loop routes each one to the per-user sinks held in the
//! [`Registry`], either to every registered user (broadcast) or to one
//! recipient (private). Hand-off is `try_send` only, so a slow consumer never
//! stalls the loop.

pub mod broker;
pub mod broker_config;
pub mod delivery_report;
mod dispatcher;
pub mod error;
pub mod message;
pub mod metrics;
pub mod metrics_timer;
pub mod registry;
pub mod shutdown_coordinator;
pub mod shutdown_guard;

pub use broker::Broker;
pub use broker_config::BrokerConfig;
pub use delivery_report::DeliveryReport;
pub(crate) use dispatcher::Dispatcher;
pub use error::{BrokerError, Result};
pub use message::Message;
pub use metrics::Metrics;
pub use metrics_timer::MetricsTimer;
pub use registry::Registry;
pub use shutdown_coordinator::ShutdownCoordinator;
pub use shutdown_guard::ShutdownGuard;

#[cfg(test)]
mod tests;
