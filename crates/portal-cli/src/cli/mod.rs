//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use portal_core::api::BASE_URL_ENV_VAR;
use portal_core::config;

mod commands;

#[derive(Parser)]
#[command(name = "portal")]
#[command(version)]
#[command(about = "School portal client: login, OTP verification and dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override the API base URL
    #[arg(long, global = true, value_name = "URL", env = BASE_URL_ENV_VAR)]
    base_url: Option<String>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Show the persisted session and the screen the UI would open on
    Status,
    /// Remove the persisted session
    Logout,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // one tokio runtime for everything; the UI loop runs on this thread
    // while requests run on the runtime's workers
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
    let _enter = rt.enter();

    dispatch(cli)
}

fn dispatch(cli: Cli) -> Result<()> {
    let Cli { command, base_url } = cli;

    match command {
        None => {
            let config = config::Config::load().context("load config")?;
            commands::ui::run(&config, base_url.as_deref())
        }
        Some(Commands::Status) => commands::session::status(&config_or_default()),
        Some(Commands::Logout) => commands::session::logout(&config_or_default()),
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
        },
    }
}

/// Session commands still work with a broken config file; only logging
/// settings come from it.
fn config_or_default() -> config::Config {
    config::Config::load().unwrap_or_else(|e| {
        eprintln!("Warning: using default config: {e:#}");
        config::Config::default()
    })
}
