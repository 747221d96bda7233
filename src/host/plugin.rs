//! Plugin lifecycle contract
//!
//! The host calls `can_handle_*` at each lifecycle point and only calls the
//! paired handler when it returned `true`. Every predicate defaults to
//! `false` and every handler to a pass-through, so a plugin overrides just
//! the pairs it participates in.

use super::prompt::{CommandArgs, PromptGenerator};
use serde::{Deserialize, Serialize};

/// Chat message exchanged between the host and the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn new(role: &str, content: &str) -> Self {
        Self {
            role: role.to_string(),
            content: content.to_string(),
        }
    }

    pub fn system(content: &str) -> Self {
        Self::new("system", content)
    }
}

/// A host plugin
pub trait AgentPlugin: Send + Sync {
    fn name(&self) -> &str;

    fn version(&self) -> &str;

    fn description(&self) -> &str;

    fn can_handle_post_prompt(&self) -> bool {
        false
    }

    /// Extend the prompt, typically by registering commands
    fn post_prompt(&self, prompt: PromptGenerator) -> PromptGenerator {
        prompt
    }

    fn can_handle_on_response(&self) -> bool {
        false
    }

    /// Called when a response is received from the model
    fn on_response(&self, response: String) -> String {
        response
    }

    fn can_handle_on_planning(&self) -> bool {
        false
    }

    /// Called before the planning chat completion. A returned string is
    /// appended to the context as a system message.
    fn on_planning(&self, _prompt: &PromptGenerator, _messages: &[Message]) -> Option<String> {
        None
    }

    fn can_handle_post_planning(&self) -> bool {
        false
    }

    fn post_planning(&self, response: String) -> String {
        response
    }

    fn can_handle_pre_instruction(&self) -> bool {
        false
    }

    fn pre_instruction(&self, messages: Vec<Message>) -> Vec<Message> {
        messages
    }

    fn can_handle_on_instruction(&self) -> bool {
        false
    }

    fn on_instruction(&self, _messages: &[Message]) -> Option<String> {
        None
    }

    fn can_handle_post_instruction(&self) -> bool {
        false
    }

    fn post_instruction(&self, response: String) -> String {
        response
    }

    fn can_handle_pre_command(&self) -> bool {
        false
    }

    /// Rewrite a command and its arguments before execution
    fn pre_command(&self, command_name: String, arguments: CommandArgs) -> (String, CommandArgs) {
        (command_name, arguments)
    }

    fn can_handle_post_command(&self) -> bool {
        false
    }

    fn post_command(&self, _command_name: &str, response: String) -> String {
        response
    }

    fn can_handle_chat_completion(
        &self,
        _messages: &[Message],
        _model: &str,
        _temperature: f32,
        _max_tokens: u32,
    ) -> bool {
        false
    }

    /// Replace the host's chat completion with the plugin's own
    fn handle_chat_completion(
        &self,
        _messages: &[Message],
        _model: &str,
        _temperature: f32,
        _max_tokens: u32,
    ) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bare;

    impl AgentPlugin for Bare {
        fn name(&self) -> &str {
            "bare"
        }
        fn version(&self) -> &str {
            "0.1.0"
        }
        fn description(&self) -> &str {
            "no hooks"
        }
    }

    #[test]
    fn test_defaults_decline_every_hook() {
        let p = Bare;
        assert!(!p.can_handle_post_prompt());
        assert!(!p.can_handle_on_response());
        assert!(!p.can_handle_on_planning());
        assert!(!p.can_handle_post_planning());
        assert!(!p.can_handle_pre_instruction());
        assert!(!p.can_handle_on_instruction());
        assert!(!p.can_handle_post_instruction());
        assert!(!p.can_handle_pre_command());
        assert!(!p.can_handle_post_command());
        assert!(!p.can_handle_chat_completion(&[], "gpt-4", 0.0, 100));
    }

    #[test]
    fn test_default_handlers_pass_through() {
        let p = Bare;
        assert_eq!(p.on_response("hi".to_string()), "hi");
        assert_eq!(p.post_planning("plan".to_string()), "plan");
        assert_eq!(p.post_command("cmd", "out".to_string()), "out");
        assert!(p.on_instruction(&[Message::system("x")]).is_none());
        assert!(p.handle_chat_completion(&[], "gpt-4", 0.0, 100).is_none());

        let prompt = p.post_prompt(PromptGenerator::new());
        assert!(prompt.commands().is_empty());
    }

    #[test]
    fn test_message_serialization() {
        let msg = Message::new("user", "buy AAPL");
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"buy AAPL"}"#);
    }
}
