//! Error types for autogpt-robinhood

use thiserror::Error;

/// Errors raised by a brokerage session
#[derive(Error, Debug)]
pub enum BrokerError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse brokerage response: {0}")]
    Parse(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<reqwest::Error> for BrokerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            BrokerError::Parse(err.to_string())
        } else {
            BrokerError::Network(err.to_string())
        }
    }
}

/// Errors raised by the plugin adapter
#[derive(Error, Debug)]
pub enum PluginError {
    #[error("Failed to establish brokerage session: {0}")]
    Session(BrokerError),

    #[error(transparent)]
    Broker(#[from] BrokerError),

    /// The method was declared without an instance receiver and cannot be
    /// called on a plugin.
    #[error("{method}() takes {expected} positional arguments but {given} were given")]
    ArgumentBinding {
        method: &'static str,
        expected: usize,
        given: usize,
    },
}

/// Errors raised while dispatching a registered command
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Missing required argument '{argument}' for command '{command}'")]
    MissingArgument { command: String, argument: String },

    #[error("Command failed: {0}")]
    Failed(#[from] PluginError),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type alias using PluginError
pub type Result<T> = std::result::Result<T, PluginError>;
