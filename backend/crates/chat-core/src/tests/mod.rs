
use crate::{Broker, BrokerConfig, Message, ShutdownCoordinator};

use tokio::sync::mpsc;
use tokio::time::{Duration, timeout};

pub(crate) const RECV_TIMEOUT: Duration = Duration::from_secs(1);

/// Create a caller-owned delivery sink
pub(crate) fn sink(capacity: usize) -> (mpsc::Sender<Message>, mpsc::Receiver<Message>) {
    mpsc::channel(capacity)
}

/// Receive the next message, failing the test if none arrives in time
pub(crate) async fn recv_next(rx: &mut mpsc::Receiver<Message>) -> Message {
    timeout(RECV_TIMEOUT, rx.recv())
        .await
        .expect("timed out waiting for message")
        .expect("sink closed before message arrived")
}

/// Assert the sink reaches end-of-stream (after draining nothing)
pub(crate) async fn assert_closed(rx: &mut mpsc::Receiver<Message>) {
    let next = timeout(RECV_TIMEOUT, rx.recv())
        .await
        .expect("timed out waiting for end-of-stream");
    assert!(next.is_none(), "expected end-of-stream, got {next:?}");
}

/// Broker with the given queue capacity and its lifetime
pub(crate) fn broker_with_capacity(queue_capacity: usize) -> (Broker, ShutdownCoordinator) {
    let shutdown = ShutdownCoordinator::new();
    let broker = Broker::new(shutdown.clone(), BrokerConfig { queue_capacity });
    (broker, shutdown)
}
