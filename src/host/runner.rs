//! Plugin host
//!
//! Drives every registered plugin through the agent's lifecycle points.
//! A handler is only ever reached through its predicate.

use super::plugin::{AgentPlugin, Message};
use super::prompt::{CommandArgs, PromptGenerator};
use crate::error::CommandError;
use tracing::{debug, info};

/// Registered plugins, consulted in registration order
#[derive(Default)]
pub struct PluginHost {
    plugins: Vec<Box<dyn AgentPlugin>>,
}

impl PluginHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, plugin: Box<dyn AgentPlugin>) {
        info!("Loaded plugin '{}' v{}", plugin.name(), plugin.version());
        self.plugins.push(plugin);
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Let each participating plugin extend the prompt
    pub fn build_prompt(&self, mut prompt: PromptGenerator) -> PromptGenerator {
        for plugin in &self.plugins {
            if plugin.can_handle_post_prompt() {
                debug!("post_prompt: {}", plugin.name());
                prompt = plugin.post_prompt(prompt);
            }
        }
        prompt
    }

    pub fn on_response(&self, mut response: String) -> String {
        for plugin in &self.plugins {
            if plugin.can_handle_on_response() {
                response = plugin.on_response(response);
            }
        }
        response
    }

    /// Append each plugin's planning note as a system message
    pub fn on_planning(&self, prompt: &PromptGenerator, messages: &mut Vec<Message>) {
        for plugin in &self.plugins {
            if plugin.can_handle_on_planning() {
                if let Some(note) = plugin.on_planning(prompt, messages) {
                    messages.push(Message::system(&note));
                }
            }
        }
    }

    pub fn post_planning(&self, mut response: String) -> String {
        for plugin in &self.plugins {
            if plugin.can_handle_post_planning() {
                response = plugin.post_planning(response);
            }
        }
        response
    }

    pub fn pre_instruction(&self, mut messages: Vec<Message>) -> Vec<Message> {
        for plugin in &self.plugins {
            if plugin.can_handle_pre_instruction() {
                messages = plugin.pre_instruction(messages);
            }
        }
        messages
    }

    /// Collect instruction responses from participating plugins
    pub fn on_instruction(&self, messages: &[Message]) -> Vec<String> {
        self.plugins
            .iter()
            .filter(|p| p.can_handle_on_instruction())
            .filter_map(|p| p.on_instruction(messages))
            .collect()
    }

    pub fn post_instruction(&self, mut response: String) -> String {
        for plugin in &self.plugins {
            if plugin.can_handle_post_instruction() {
                response = plugin.post_instruction(response);
            }
        }
        response
    }

    pub fn pre_command(&self, mut name: String, mut args: CommandArgs) -> (String, CommandArgs) {
        for plugin in &self.plugins {
            if plugin.can_handle_pre_command() {
                (name, args) = plugin.pre_command(name, args);
            }
        }
        (name, args)
    }

    pub fn post_command(&self, name: &str, mut response: String) -> String {
        for plugin in &self.plugins {
            if plugin.can_handle_post_command() {
                response = plugin.post_command(name, response);
            }
        }
        response
    }

    /// First plugin that claims the completion answers it
    pub fn chat_completion(
        &self,
        messages: &[Message],
        model: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Option<String> {
        self.plugins
            .iter()
            .find(|p| p.can_handle_chat_completion(messages, model, temperature, max_tokens))
            .and_then(|p| p.handle_chat_completion(messages, model, temperature, max_tokens))
    }

    /// Run a registered command the way the agent loop does: pre-command
    /// hooks, dispatch, then post-command hooks over the rendered result.
    pub fn execute_command(
        &self,
        prompt: &PromptGenerator,
        name: &str,
        args: CommandArgs,
    ) -> Result<String, CommandError> {
        let (name, args) = self.pre_command(name.to_string(), args);
        debug!("Executing command '{}'", name);
        let result = prompt.execute(&name, &args)?;
        let rendered = match result {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };
        Ok(self.post_command(&name, rendered))
    }
}
