//! Robinhood plugin
//!
//! Participates in exactly one lifecycle point, `post_prompt`, where it
//! registers the quote and news commands. Everything else the brokerage
//! offers is reachable only by calling the plugin's methods directly.

mod commands;

use crate::broker::{Brokerage, Connector, Credentials};
use crate::error::{CommandError, PluginError, Result};
use crate::host::{require_string, AgentPlugin, CommandArgs, CommandHandler, PromptGenerator};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

pub const PLUGIN_NAME: &str = "Auto-GPT-Robinhood";
pub const PLUGIN_VERSION: &str = "0.0.1";
pub const PLUGIN_DESCRIPTION: &str = "This is a plugin for Auto-GPT-Robinhood.";

/// Settings the host supplies before the plugin is built
#[derive(Debug, Clone)]
pub struct PluginConfig {
    pub credentials: Credentials,
}

impl PluginConfig {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    /// Credentials from `ROBINHOOD_USERNAME` / `ROBINHOOD_PASSWORD`
    pub fn from_env() -> Self {
        Self::new(Credentials::from_env())
    }
}

struct Inner<B> {
    config: PluginConfig,
    robinhood: B,
}

/// Plugin bound to one brokerage session for its whole lifetime.
///
/// Clones are handles to the same session; registered commands hold one.
pub struct RobinhoodPlugin<B> {
    inner: Arc<Inner<B>>,
}

impl<B> Clone for RobinhoodPlugin<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B: Brokerage + 'static> RobinhoodPlugin<B> {
    /// Establish the brokerage session, then build the plugin around it.
    /// Credentials go to the connector as given; nothing is checked first.
    pub fn connect<C>(config: PluginConfig, connector: &C) -> Result<Self>
    where
        C: Connector<Session = B>,
    {
        let session = connector
            .connect(&config.credentials)
            .map_err(PluginError::Session)?;
        info!("{} v{} connected", PLUGIN_NAME, PLUGIN_VERSION);
        Ok(Self::with_client(config, session))
    }

    /// Build around an already established session
    pub fn with_client(config: PluginConfig, robinhood: B) -> Self {
        Self {
            inner: Arc::new(Inner { config, robinhood }),
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.inner.config.credentials
    }

    pub fn client(&self) -> &B {
        &self.inner.robinhood
    }

    fn forward(&self, operation: &str) -> &B {
        debug!("Forwarding {} to brokerage", operation);
        &self.inner.robinhood
    }

    /// Handler that reads `symbol` and calls `call` on this plugin
    fn bind<F>(&self, command: &'static str, call: F) -> CommandHandler
    where
        F: Fn(&Self, &str) -> Result<Value> + Send + Sync + 'static,
    {
        let plugin = self.clone();
        Arc::new(
            move |args: &CommandArgs| -> std::result::Result<Value, CommandError> {
                let symbol = require_string(command, args, "symbol")?;
                Ok(call(&plugin, symbol)?)
            },
        )
    }
}

impl<B: Brokerage + 'static> AgentPlugin for RobinhoodPlugin<B> {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    fn version(&self) -> &str {
        PLUGIN_VERSION
    }

    fn description(&self) -> &str {
        PLUGIN_DESCRIPTION
    }

    fn can_handle_post_prompt(&self) -> bool {
        true
    }

    fn post_prompt(&self, mut prompt: PromptGenerator) -> PromptGenerator {
        prompt.add_command(
            "Quote Data",
            "quote_data",
            &[("symbol", "<symbol>")],
            self.bind("quote_data", Self::quote_data),
        );
        // TODO: get_quote_list
        // TODO: get_quote
        // TODO: get_stock_marketdata
        // TODO: get_historical_quotes
        prompt.add_command(
            "Get Stock News",
            "get_stock_news",
            &[("symbol", "<symbol>")],
            self.bind("get_stock_news", Self::get_stock_news),
        );
        info!("{} registered quote_data, get_stock_news", PLUGIN_NAME);
        prompt
    }
}
