//! Lyttekort CLI entry point.

use anyhow::Result;
use clap::Parser;
use lyttekort::cli::{commands, Cli, Commands};
use lyttekort::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Secrets (GPODDER_PASSWORD, OPENAI_API_KEY) may live in a .env file
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("lyttekort={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Ensure data directories exist
    std::fs::create_dir_all(settings.data_dir())?;
    std::fs::create_dir_all(settings.episodes_dir())?;
    std::fs::create_dir_all(settings.transcripts_dir())?;
    std::fs::create_dir_all(settings.results_dir())?;

    // Execute command
    match &cli.command {
        Commands::Sync { all, local } => {
            commands::run_sync(*all, *local, settings).await?;
        }

        Commands::Transcribe { force } => {
            commands::run_transcribe(*force, settings).await?;
        }

        Commands::Cards { yes, model } => {
            commands::run_cards(*yes, model.clone(), settings).await?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings)?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings)?;
        }
    }

    Ok(())
}
