//! CLI entry point for the imgsearch tool.

use std::fs::File;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

mod cli;
mod commands;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before parsing so env-backed arguments see its values
    let dotenv_path = dotenvy::dotenv().ok();

    // Parse CLI arguments first (before tracing, so --help works without logs)
    let cli = Cli::parse();

    init_tracing(&cli)?;

    if let Some(path) = dotenv_path {
        debug!(path = %path.display(), "loaded environment file");
    }
    debug!(?cli, "CLI arguments parsed");
    info!("imgsearch starting");

    match &cli.command {
        Command::Search(args) => commands::run_search_command(args).await,
        Command::Images(args) => commands::run_images_command(args).await,
    }
}

/// Installs the tracing subscriber.
///
/// Priority: RUST_LOG env var > quiet flag > verbose flag > default (info).
fn init_tracing(cli: &Cli) -> Result<()> {
    let default_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    match &cli.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    }
    Ok(())
}
