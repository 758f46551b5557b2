use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Config error: {0}")]
    Config(#[from] chat_config::ConfigError),

    #[error("Broker error: {0}")]
    Broker(#[from] chat_core::BrokerError),

    #[error("Dispatch task failed: {0}")]
    Dispatch(#[from] tokio::task::JoinError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Logger error: {message}")]
    Logger { message: String },

    #[error("Usage: {usage}")]
    Usage { usage: &'static str },
}

pub type Result<T> = std::result::Result<T, ServerError>;
