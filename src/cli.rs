//! Command-line argument parsing for autogpt-robinhood

use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;

use crate::host::CommandArgs;

/// autogpt-robinhood - Robinhood commands for an autonomous agent
#[derive(Parser, Debug)]
#[command(name = "autogpt-robinhood")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Print the commands the plugin registers with the agent prompt
    Commands,

    /// Execute a registered command and print its JSON result
    Run {
        /// Command name, e.g. quote_data
        #[arg(value_name = "NAME")]
        name: String,

        /// Command argument, repeatable
        #[arg(short, long = "arg", value_name = "KEY=VALUE", value_parser = parse_key_value)]
        args: Vec<(String, String)>,
    },
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", raw)),
    }
}

/// Arguments in the shape the host hands to command handlers
pub fn command_args(pairs: &[(String, String)]) -> CommandArgs {
    pairs
        .iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commands_subcommand() {
        let args = Args::parse_from(["autogpt-robinhood", "commands"]);
        assert_eq!(args.command, Command::Commands);
        assert!(args.config.is_none());
        assert!(!args.debug);
    }

    #[test]
    fn test_run_with_args() {
        let args = Args::parse_from([
            "autogpt-robinhood",
            "--debug",
            "run",
            "quote_data",
            "--arg",
            "symbol=AAPL",
            "--config",
            "/tmp/config.toml",
        ]);
        assert!(args.debug);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/config.toml")));
        assert_eq!(
            args.command,
            Command::Run {
                name: "quote_data".to_string(),
                args: vec![("symbol".to_string(), "AAPL".to_string())],
            }
        );
    }

    #[test]
    fn test_arg_without_equals_rejected() {
        let result =
            Args::try_parse_from(["autogpt-robinhood", "run", "quote_data", "--arg", "AAPL"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_value_may_contain_equals() {
        assert_eq!(
            parse_key_value("url=https://x/?a=b").unwrap(),
            ("url".to_string(), "https://x/?a=b".to_string())
        );
    }

    #[test]
    fn test_command_args_are_strings() {
        let args = command_args(&[("symbol".to_string(), "TSLA".to_string())]);
        assert_eq!(args.get("symbol"), Some(&Value::String("TSLA".to_string())));
    }
}
