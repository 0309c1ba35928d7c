//! Transcription module for lyttekort.
//!
//! Speech-to-text runs locally through the whisper.cpp CLI; the audio file
//! is decoded to WAV first, since the engine only accepts 16 kHz mono PCM.

mod whisper;

pub use whisper::WhisperCliTranscriber;

use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// A plain-text transcript of one episode.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    pub text: String,
}

impl Transcript {
    pub fn new(text: String) -> Self {
        Self { text }
    }

    /// Write the transcript to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, &self.text)?;
        Ok(())
    }

    /// Read a transcript back from a file.
    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self {
            text: std::fs::read_to_string(path)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Trait for transcription services.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe an audio file into plain text.
    async fn transcribe(&self, audio_path: &Path) -> Result<Transcript>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ep-1.txt");

        let transcript = Transcript::new("Hello from the show.\n".to_string());
        transcript.save(&path).unwrap();

        assert_eq!(Transcript::load(&path).unwrap(), transcript);
    }

    #[test]
    fn test_whitespace_only_is_empty() {
        assert!(Transcript::new("  \n\t".to_string()).is_empty());
        assert!(!Transcript::new("words".to_string()).is_empty());
    }
}
