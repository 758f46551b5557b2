use chat_config::Config;
use chat_core::{Broker, BrokerConfig, ShutdownCoordinator};
use chat_server::console::spawn_stdin_reader;
use chat_server::logger::{self, LogOutput};
use chat_server::{Console, ServerResult};

use std::sync::Arc;

use log::{error, info};

#[tokio::main]
async fn main() -> ServerResult<()> {
    // Load and validate configuration
    let config = Config::load()?;
    config.validate()?;

    let log_file_path = config.log_file_path()?;
    if let Some(log_dir) = log_file_path.as_deref().and_then(|path| path.parent()) {
        std::fs::create_dir_all(log_dir)?;
    }

    // Initialize logger (before any other logging)
    logger::initialize(
        config.logging.level,
        LogOutput::select(log_file_path, config.logging.colored),
    )?;

    info!("Starting chat-server v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    let shutdown = ShutdownCoordinator::new();
    let broker = Arc::new(Broker::new(
        shutdown.clone(),
        BrokerConfig {
            queue_capacity: config.broker.queue_capacity,
        },
    ));
    let dispatch = broker.run()?;

    // Spawn signal handler for graceful shutdown
    let shutdown_for_signal = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received SIGINT (Ctrl+C), initiating graceful shutdown");
                shutdown_for_signal.shutdown();
            }
            Err(e) => {
                error!("Failed to listen for SIGINT: {}", e);
            }
        }
    });

    info!("Commands: /join <user>, /leave <user>, /to <user> <text>, /who, /quit");
    let console = Console::new(
        Arc::clone(&broker),
        shutdown.clone(),
        config.broker.sink_buffer_size,
    );
    console.run(spawn_stdin_reader()).await;

    broker.wait_done().await;
    dispatch.await?;
    info!("Shutdown complete");

    Ok(())
}
