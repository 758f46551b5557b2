use crate::error::ServerError;

use std::str::FromStr;

const JOIN_USAGE: &str = "/join <user>";
const LEAVE_USAGE: &str = "/leave <user>";
const TO_USAGE: &str = "/to <user> <text>";

/// One line of console input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Register a user and start printing what it receives
    Join(String),
    /// Unregister a user
    Leave(String),
    /// Private message from the console
    To { recipient: String, content: String },
    /// List registered users
    Who,
    /// Trigger shutdown
    Quit,
    /// Broadcast from the console
    Say(String),
    /// Blank line
    Empty,
}

impl FromStr for ConsoleCommand {
    type Err = ServerError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Self::Empty);
        }

        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command {
            "/join" => single_user(rest, JOIN_USAGE).map(Self::Join),
            "/leave" => single_user(rest, LEAVE_USAGE).map(Self::Leave),
            "/to" => {
                let Some((recipient, content)) = rest.split_once(char::is_whitespace) else {
                    return Err(ServerError::Usage { usage: TO_USAGE });
                };
                let content = content.trim();
                if content.is_empty() {
                    return Err(ServerError::Usage { usage: TO_USAGE });
                }
                Ok(Self::To {
                    recipient: recipient.to_string(),
                    content: content.to_string(),
                })
            }
            "/who" => Ok(Self::Who),
            "/quit" => Ok(Self::Quit),
            _ => Ok(Self::Say(line.to_string())),
        }
    }
}

fn single_user(rest: &str, usage: &'static str) -> Result<String, ServerError> {
    match rest.split_whitespace().collect::<Vec<_>>().as_slice() {
        [user] => Ok((*user).to_string()),
        _ => Err(ServerError::Usage { usage }),
    }
}
