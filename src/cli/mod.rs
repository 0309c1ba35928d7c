//! CLI module for lyttekort.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Lyttekort - Podcasts to Flashcards
///
/// A CLI pipeline that turns podcast episodes you have finished listening to
/// into Anki flashcards. The name "Lyttekort" comes from the Norwegian words
/// for "listening cards."
#[derive(Parser, Debug)]
#[command(name = "lyttekort")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch finished episodes from the gpodder server and download their audio
    Sync {
        /// Fetch the full action history instead of changes since the last sync
        #[arg(short, long)]
        all: bool,

        /// Print the local episode catalog without contacting the server
        #[arg(short, long)]
        local: bool,
    },

    /// Transcribe downloaded episodes with the local whisper engine
    Transcribe {
        /// Re-transcribe episodes that already have a transcript
        #[arg(short, long)]
        force: bool,
    },

    /// Summarize transcripts into key points and export the Anki CSV
    Cards {
        /// Skip the confirmation prompt before calling the LLM API
        #[arg(short, long)]
        yes: bool,

        /// Chat model to use instead of the configured one
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Check system requirements and configuration
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "cards.model")
        key: String,
        /// Configuration value
        value: String,
    },

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}
