//! glidebar CLI
//!
//! - `glidebar run <scenario.toml>` replays a scenario against an in-memory
//!   container and prints every notification as a JSON line
//! - `glidebar check <settings>` validates a settings file (TOML or JSON)
//!   and prints the resolved settings

mod config;
mod simulate;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use glidebar::Settings;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;

use crate::config::Scenario;

/// Custom scrollbar engine tools
#[derive(Parser, Debug)]
#[command(name = "glidebar")]
#[command(about = "Replay scroll scenarios and validate glidebar settings")]
#[command(version)]
struct Cli {
    /// Log engine internals to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a scenario and print notifications as JSON lines
    Run {
        /// Scenario file (TOML)
        scenario: PathBuf,
    },
    /// Validate a settings file and print the resolved settings
    Check {
        /// Settings file (.toml or .json)
        settings: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Commands::Run { scenario } => {
            let scenario = Scenario::load(&scenario)?;
            let stdout = io::stdout();
            let mut out = stdout.lock();
            let written = simulate::run(&scenario, &mut out)?;
            out.flush()?;
            info!(notifications = written, "scenario finished");
        }
        Commands::Check { settings } => {
            let content = fs::read_to_string(&settings)
                .with_context(|| format!("Failed to read {}", settings.display()))?;
            let is_json = settings
                .extension()
                .is_some_and(|extension| extension == "json");
            let resolved = if is_json {
                Settings::from_json_str(&content)
            } else {
                Settings::from_toml_str(&content)
            }
            .with_context(|| format!("Invalid settings in {}", settings.display()))?;
            println!("{}", serde_json::to_string_pretty(&resolved)?);
        }
    }

    Ok(())
}
