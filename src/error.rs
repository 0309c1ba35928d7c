//! Error types for lyttekort.

use thiserror::Error;

/// Library-level error type for lyttekort operations.
#[derive(Error, Debug)]
pub enum LyttekortError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("gpodder API error: {0}")]
    Gpodder(String),

    #[error("Feed error: {0}")]
    Feed(String),

    #[error("Audio download failed: {0}")]
    AudioDownload(String),

    #[error("Transcription failed: {0}")]
    Transcription(String),

    #[error("Card generation failed: {0}")]
    Cards(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("Episode not found: {0}")]
    EpisodeNotFound(String),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),

    #[error("External tool failed: {0}")]
    ToolFailed(String),
}

/// Result type alias for lyttekort operations.
pub type Result<T> = std::result::Result<T, LyttekortError>;
