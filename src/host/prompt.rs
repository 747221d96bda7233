//! Prompt command registry
//!
//! Commands registered here are what the model can call. Each carries an
//! ordered argument list (name → placeholder) and the handler the host
//! dispatches to.

use crate::error::CommandError;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Arguments the model supplied for a command
pub type CommandArgs = HashMap<String, Value>;

/// Callable bound to a registered command
pub type CommandHandler = Arc<dyn Fn(&CommandArgs) -> Result<Value, CommandError> + Send + Sync>;

/// A command advertised to the model
#[derive(Clone)]
pub struct CommandDescriptor {
    /// Human-readable label (e.g., "Quote Data")
    pub label: String,
    /// Machine name the model calls (e.g., "quote_data")
    pub name: String,
    /// Argument name → placeholder, in declaration order
    pub args: Vec<(String, String)>,
    pub handler: CommandHandler,
}

impl fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("label", &self.label)
            .field("name", &self.name)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

impl CommandDescriptor {
    /// Render as a prompt line body: `Label: "name", args: "a": "<a>"`
    pub fn render(&self) -> String {
        let args = self
            .args
            .iter()
            .map(|(name, placeholder)| format!("\"{}\": \"{}\"", name, placeholder))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}: \"{}\", args: {}", self.label, self.name, args)
    }
}

/// Builds the command section of the agent prompt
#[derive(Debug, Clone, Default)]
pub struct PromptGenerator {
    commands: Vec<CommandDescriptor>,
}

impl PromptGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command. Names are not checked for collisions.
    pub fn add_command(
        &mut self,
        label: &str,
        name: &str,
        args: &[(&str, &str)],
        handler: CommandHandler,
    ) {
        self.commands.push(CommandDescriptor {
            label: label.to_string(),
            name: name.to_string(),
            args: args
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            handler,
        });
    }

    pub fn commands(&self) -> &[CommandDescriptor] {
        &self.commands
    }

    /// First command registered under `name`
    pub fn command(&self, name: &str) -> Option<&CommandDescriptor> {
        self.commands.iter().find(|c| c.name == name)
    }

    pub fn has_command(&self, name: &str) -> bool {
        self.command(name).is_some()
    }

    /// Dispatch to a registered command's handler
    pub fn execute(&self, name: &str, args: &CommandArgs) -> Result<Value, CommandError> {
        let command = self
            .command(name)
            .ok_or_else(|| CommandError::UnknownCommand(name.to_string()))?;
        (command.handler)(args)
    }

    /// Numbered command list for the model
    pub fn generate_prompt_string(&self) -> String {
        self.commands
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{}. {}", i + 1, c.render()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Read a required string argument
pub fn require_string<'a>(
    command: &str,
    args: &'a CommandArgs,
    name: &str,
) -> Result<&'a str, CommandError> {
    args.get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| CommandError::MissingArgument {
            command: command.to_string(),
            argument: name.to_string(),
        })
}
