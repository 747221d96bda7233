//! autogpt-robinhood - drive the Robinhood plugin the way an agent host does
//!
//! This is the main entry point for the autogpt-robinhood binary.

use anyhow::{Context, Result};
use autogpt_robinhood::cli::{command_args, Args, Command};
use autogpt_robinhood::config::Config;
use autogpt_robinhood::host::{PluginHost, PromptGenerator};
use autogpt_robinhood::plugin::{PluginConfig, RobinhoodPlugin};
use autogpt_robinhood::RobinhoodConnector;
use clap::Parser;
use tracing::{error, info};

fn main() {
    let args = Args::parse();

    init_logging(args.debug);

    info!("Starting autogpt-robinhood v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(args) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = Config::load(args.config.as_deref()).context("Failed to load configuration")?;
    config.validate()?;

    let connector = RobinhoodConnector::from_config(&config.robinhood);
    let plugin = RobinhoodPlugin::connect(PluginConfig::new(config.credentials()), &connector)?;

    let mut host = PluginHost::new();
    host.register(Box::new(plugin));
    let prompt = host.build_prompt(PromptGenerator::new());

    match args.command {
        Command::Commands => {
            println!("{}", prompt.generate_prompt_string());
        }
        Command::Run { name, args } => {
            let output = host.execute_command(&prompt, &name, command_args(&args))?;
            println!("{}", output);
        }
    }

    Ok(())
}

/// Initialize the logging/tracing subsystem
fn init_logging(debug: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
