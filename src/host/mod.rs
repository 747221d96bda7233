//! Agent host contract
//!
//! The pieces of the host runtime a plugin touches: the lifecycle hook
//! trait, the prompt command registry, and the driver that calls hooks.

mod plugin;
mod prompt;
mod runner;

pub use plugin::{AgentPlugin, Message};
pub use prompt::{require_string, CommandArgs, CommandDescriptor, CommandHandler, PromptGenerator};
pub use runner::PluginHost;
