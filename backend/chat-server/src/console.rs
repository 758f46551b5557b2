use crate::ConsoleCommand;

use std::io::BufRead;
use std::ops::ControlFlow;
use std::sync::Arc;

use chat_core::{Broker, Message, ShutdownCoordinator};
use log::{debug, error, info, warn};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Sender name for everything typed at the console
pub const CONSOLE_SENDER: &str = "console";

/// Stdin-driven host for a broker.
///
/// Plays the part of the surrounding layer: it owns the per-user sinks it
/// registers and drains each one in its own task.
pub struct Console {
    broker: Arc<Broker>,
    shutdown: ShutdownCoordinator,
    sink_buffer_size: usize,
}

impl Console {
    pub fn new(broker: Arc<Broker>, shutdown: ShutdownCoordinator, sink_buffer_size: usize) -> Self {
        Self {
            broker,
            shutdown,
            sink_buffer_size: sink_buffer_size.max(1),
        }
    }

    /// Process lines until `/quit`, end of input, or shutdown.
    ///
    /// End of input triggers shutdown. Usage errors and a full inbound queue
    /// are logged and the loop continues.
    pub async fn run(&self, mut lines: mpsc::Receiver<String>) {
        let mut guard = self.shutdown.subscribe_guard();

        loop {
            let line = tokio::select! {
                biased;

                _ = guard.wait() => {
                    debug!("Console observed shutdown");
                    return;
                }

                line = lines.recv() => line,
            };

            let Some(line) = line else {
                info!("End of input, shutting down");
                self.shutdown.shutdown();
                return;
            };

            let command = match line.parse::<ConsoleCommand>() {
                Ok(command) => command,
                Err(e) => {
                    warn!("{e}");
                    continue;
                }
            };

            if self.execute(command).await.is_break() {
                return;
            }
        }
    }

    /// Apply one command.
    pub async fn execute(&self, command: ConsoleCommand) -> ControlFlow<()> {
        match command {
            ConsoleCommand::Join(user) => {
                self.join(user).await;
            }
            ConsoleCommand::Leave(user) => {
                if self.broker.is_registered(&user).await {
                    self.broker.unregister(&user).await;
                    info!("{user} left");
                } else {
                    warn!("{user} is not registered");
                }
            }
            ConsoleCommand::To { recipient, content } => {
                return self.submit(Message::private(CONSOLE_SENDER, recipient, content));
            }
            ConsoleCommand::Who => {
                let users = self.broker.registered_users().await;
                if users.is_empty() {
                    info!("No users registered");
                } else {
                    info!("Registered users ({}): {}", users.len(), users.join(", "));
                }
            }
            ConsoleCommand::Quit => {
                info!("Quit requested");
                self.shutdown.shutdown();
                return ControlFlow::Break(());
            }
            ConsoleCommand::Say(content) => {
                return self.submit(Message::broadcast(CONSOLE_SENDER, content));
            }
            ConsoleCommand::Empty => {}
        }

        ControlFlow::Continue(())
    }

    /// Register `user` with a broker-owned sink and drain it in the background.
    /// The task ends when the user leaves or joins again.
    pub async fn join(&self, user: String) -> JoinHandle<()> {
        let mut rx = self
            .broker
            .register_channel(user.clone(), self.sink_buffer_size)
            .await;
        info!("{user} joined");

        tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                info!("{}", render_delivery(&user, &message));
            }
            debug!("Stream for {user} ended");
        })
    }

    /// A full queue is reported and skipped; a finished broker ends the console.
    fn submit(&self, message: Message) -> ControlFlow<()> {
        match self.broker.submit(message) {
            Ok(()) => ControlFlow::Continue(()),
            Err(e) if e.is_transient() => {
                warn!("Message not sent: {e}");
                ControlFlow::Continue(())
            }
            Err(e) => {
                info!("Broker no longer accepts messages: {e}");
                ControlFlow::Break(())
            }
        }
    }
}

/// One delivered message as shown on the console
pub fn render_delivery(user: &str, message: &Message) -> String {
    let scope = if message.broadcast { "all" } else { "private" };
    format!(
        "[{user}] <{}> ({scope}, t={}) {}",
        message.sender, message.timestamp, message.content
    )
}

/// Read stdin on a dedicated thread so a pending read never holds up runtime
/// shutdown. The channel closes at end of input.
pub fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(64);

    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    error!("Failed to read stdin: {e}");
                    break;
                }
            }
        }
    });

    rx
}
