//! End-to-end scenarios for the broker
//!
//! These tests drive the public API only: a surrounding layer creates sinks,
//! registers them, submits messages and reads what arrives.

use chat_core::{Broker, BrokerConfig, BrokerError, Message, ShutdownCoordinator};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Duration, timeout};

const RECV_TIMEOUT: Duration = Duration::from_secs(1);

// =========================================================================
// Test Fixtures
// =========================================================================

/// Running broker plus the lifetime it is bound to.
/// Triggers shutdown on drop so no dispatch task outlives its test.
struct TestBroker {
    broker: Broker,
    shutdown: ShutdownCoordinator,
    handle: Option<JoinHandle<()>>,
}

impl TestBroker {
    fn start() -> Self {
        let shutdown = ShutdownCoordinator::new();
        let broker = Broker::new(shutdown.clone(), BrokerConfig::default());
        let handle = broker.run().expect("first run should start the loop");
        Self {
            broker,
            shutdown,
            handle: Some(handle),
        }
    }

    /// Register a user with a fresh sink and hand back its receiver
    async fn user(&self, user_id: &str) -> mpsc::Receiver<Message> {
        let (tx, rx) = mpsc::channel(16);
        self.broker.register(user_id, tx).await;
        rx
    }

    async fn stop(&mut self) {
        self.shutdown.shutdown();
        if let Some(handle) = self.handle.take() {
            timeout(RECV_TIMEOUT, handle)
                .await
                .expect("dispatch loop should exit after shutdown")
                .expect("dispatch task should not panic");
        }
    }
}

impl Drop for TestBroker {
    fn drop(&mut self) {
        self.shutdown.shutdown();
    }
}

async fn recv(rx: &mut mpsc::Receiver<Message>) -> Option<Message> {
    timeout(RECV_TIMEOUT, rx.recv())
        .await
        .expect("timed out waiting on sink")
}

// =========================================================================
// Scenarios
// =========================================================================

#[tokio::test]
async fn given_alice_and_bob_when_bob_leaves_then_only_alice_receives_and_carol_is_dropped() {
    // Given
    let fixture = TestBroker::start();
    let mut alice = fixture.user("alice").await;
    let mut bob = fixture.user("bob").await;

    // When - broadcast while both are registered
    fixture
        .broker
        .submit(Message::broadcast("alice", "hi"))
        .unwrap();

    // Then
    let to_alice = recv(&mut alice).await.unwrap();
    let to_bob = recv(&mut bob).await.unwrap();
    assert_eq!(to_alice.content, "hi");
    assert_eq!(to_bob.content, "hi");
    assert!(to_alice.timestamp > 0);

    // When - bob leaves, another broadcast goes out
    fixture.broker.unregister("bob").await;
    fixture
        .broker
        .submit(Message::broadcast("alice", "still here?"))
        .unwrap();

    // Then
    assert_eq!(recv(&mut alice).await.unwrap().content, "still here?");
    assert!(recv(&mut bob).await.is_none(), "bob's stream should end");

    // When - private message to someone who never registered
    let result = fixture
        .broker
        .submit(Message::private("alice", "carol", "anyone?"));

    // Then - accepted, and nobody else gets it
    assert!(result.is_ok());
    fixture
        .broker
        .submit(Message::private("alice", "alice", "marker"))
        .unwrap();
    assert_eq!(recv(&mut alice).await.unwrap().content, "marker");
}

#[tokio::test]
async fn given_running_broker_when_shutdown_then_done_and_submit_cancelled() {
    // Given
    let mut fixture = TestBroker::start();
    let mut alice = fixture.user("alice").await;

    // When
    fixture.stop().await;

    // Then
    assert!(fixture.broker.is_done());
    timeout(RECV_TIMEOUT, fixture.broker.wait_done())
        .await
        .expect("completion signal should already be raised");

    let err = fixture
        .broker
        .submit(Message::broadcast("alice", "too late"))
        .unwrap_err();
    assert!(matches!(err, BrokerError::Cancelled { .. }));
    assert!(alice.try_recv().is_err());
}

#[tokio::test]
async fn given_empty_user_id_when_registered_then_treated_as_ordinary_key() {
    let mut fixture = TestBroker::start();
    let mut anonymous = fixture.user("").await;

    fixture
        .broker
        .submit(Message::private("alice", "", "to nobody in particular"))
        .unwrap();

    assert_eq!(
        recv(&mut anonymous).await.unwrap().content,
        "to nobody in particular"
    );
    fixture.stop().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn given_many_users_when_broadcast_then_each_receives_once() {
    // Given
    let fixture = TestBroker::start();
    let mut receivers = Vec::new();
    for i in 0..10 {
        receivers.push(fixture.user(&format!("user-{i}")).await);
    }

    // When
    fixture
        .broker
        .submit(Message::broadcast("system", "welcome"))
        .unwrap();

    // Then
    for rx in receivers.iter_mut() {
        assert_eq!(recv(rx).await.unwrap().content, "welcome");
        assert!(rx.try_recv().is_err());
    }
    assert_eq!(fixture.broker.registered_count().await, 10);
}
