//! Pre-flight checks before expensive operations.
//!
//! Validates that required tools, credentials, and model files are
//! available before starting operations that would otherwise fail midway.

use crate::config::Settings;
use crate::error::{LyttekortError, Result};
use std::process::Command;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Syncing requires gpodder credentials.
    Sync,
    /// Transcription requires the whisper binary, ffmpeg, and a model file.
    Transcribe,
    /// Card generation requires the OpenAI API key.
    Cards,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Sync => {
            check_gpodder_credentials(settings)?;
        }
        Operation::Transcribe => {
            check_tool("ffmpeg")?;
            check_tool(&settings.transcription.binary)?;
            check_model_file(settings)?;
        }
        Operation::Cards => {
            check_api_key()?;
        }
    }
    Ok(())
}

/// Check that the gpodder account is configured.
fn check_gpodder_credentials(settings: &Settings) -> Result<()> {
    if settings.gpodder.username.is_empty() {
        return Err(LyttekortError::Config(
            "gpodder username not configured. Set it with: lyttekort config edit".to_string(),
        ));
    }
    settings.gpodder.password().map(|_| ())
}

/// Check that the configured whisper model file exists.
fn check_model_file(settings: &Settings) -> Result<()> {
    let model_path = settings.transcription.model_path();
    if model_path.exists() {
        Ok(())
    } else {
        Err(LyttekortError::Config(format!(
            "Whisper model not found at {}",
            model_path.display()
        )))
    }
}

/// Check if OpenAI API key is configured.
fn check_api_key() -> Result<()> {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(LyttekortError::Config(
            "OPENAI_API_KEY is empty. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
        Err(_) => Err(LyttekortError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
    }
}

/// Check if an external tool is available.
fn check_tool(name: &str) -> Result<()> {
    // ffmpeg uses -version (single dash); whisper-cli only knows -h
    let version_arg = match name {
        "ffmpeg" | "ffprobe" => "-version",
        _ => "-h",
    };
    match Command::new(name).arg(version_arg).output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(_) => Err(LyttekortError::ToolNotFound(format!(
            "{} is installed but not working correctly",
            name
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(LyttekortError::ToolNotFound(name.to_string()))
        }
        Err(e) => Err(LyttekortError::ToolNotFound(format!("{}: {}", name, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_requires_username() {
        let settings = Settings::default();
        // Default settings have an empty username
        assert!(check(Operation::Sync, &settings).is_err());
    }

    #[test]
    fn test_transcribe_requires_model_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.transcription.model_dir = dir.path().to_string_lossy().to_string();

        assert!(check_model_file(&settings).is_err());

        std::fs::write(dir.path().join("ggml-small.bin"), b"stub").unwrap();
        assert!(check_model_file(&settings).is_ok());
    }
}
