//! autogpt-robinhood - Robinhood brokerage commands for an autonomous agent
//!
//! The [`plugin::RobinhoodPlugin`] answers the host's capability hooks and
//! forwards brokerage operations to a [`broker::Brokerage`] session.

pub mod broker;
pub mod cli;
pub mod config;
pub mod error;
pub mod host;
pub mod plugin;

#[cfg(test)]
mod testing;

pub use broker::{Brokerage, Connector, Credentials, RobinhoodClient, RobinhoodConnector};
pub use error::{BrokerError, CommandError, ConfigError, PluginError, Result};
pub use host::{AgentPlugin, PluginHost, PromptGenerator};
pub use plugin::{PluginConfig, RobinhoodPlugin};
