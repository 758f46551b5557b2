pub mod console;
pub mod console_command;
pub mod error;
pub mod logger;


pub use console::Console;
pub use console_command::ConsoleCommand;
pub use error::{Result as ServerResult, ServerError};
