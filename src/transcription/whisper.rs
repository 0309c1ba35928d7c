//! whisper.cpp CLI transcription implementation.

use super::{Transcriber, Transcript};
use crate::audio::decode_to_wav;
use crate::config::{Settings, TranscriptionSettings};
use crate::error::{LyttekortError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

/// Transcriber backed by the whisper.cpp `whisper-cli` binary.
#[derive(Debug)]
pub struct WhisperCliTranscriber {
    binary: String,
    model_path: PathBuf,
    language: Option<String>,
}

impl WhisperCliTranscriber {
    /// Create a transcriber from the configured engine settings.
    ///
    /// Fails if the configured model file is missing.
    pub fn new(settings: &TranscriptionSettings) -> Result<Self> {
        let model_path = settings.model_path();

        if !model_path.exists() {
            return Err(LyttekortError::Config(format!(
                "Whisper model not found at {}. Download {} from the whisper.cpp model repository into {}.",
                model_path.display(),
                settings.model.file_name(),
                Settings::expand_path(&settings.model_dir).display(),
            )));
        }

        Ok(Self {
            binary: settings.binary.clone(),
            model_path,
            language: settings.language.clone(),
        })
    }

    /// Run the engine over a prepared WAV file, writing text next to `out_base`.
    async fn run_engine(&self, wav_path: &Path, out_base: &Path) -> Result<()> {
        let mut command = Command::new(&self.binary);
        command
            .arg("-m").arg(&self.model_path)
            .arg("-f").arg(wav_path)
            .arg("-otxt")
            .arg("-of").arg(out_base)
            .arg("-np");

        if let Some(lang) = &self.language {
            command.arg("-l").arg(lang);
        }

        let result = command
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await;

        let output = match result {
            Ok(o) => o,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(LyttekortError::ToolNotFound(self.binary.clone()));
            }
            Err(e) => {
                return Err(LyttekortError::Transcription(format!(
                    "{} execution failed: {}",
                    self.binary, e
                )));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(LyttekortError::Transcription(format!(
                "{} failed: {}",
                self.binary, stderr
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl Transcriber for WhisperCliTranscriber {
    #[instrument(skip(self), fields(audio_path = %audio_path.display()))]
    async fn transcribe(&self, audio_path: &Path) -> Result<Transcript> {
        let temp_dir = tempfile::tempdir()?;

        let wav_path = temp_dir.path().join("audio.wav");
        decode_to_wav(audio_path, &wav_path).await?;

        info!("Transcribing with model {}", self.model_path.display());

        let out_base = temp_dir.path().join("transcript");
        self.run_engine(&wav_path, &out_base).await?;

        let text_path = out_base.with_extension("txt");
        let text = std::fs::read_to_string(&text_path).map_err(|e| {
            LyttekortError::Transcription(format!(
                "Engine produced no transcript at {}: {}",
                text_path.display(),
                e
            ))
        })?;

        let transcript = Transcript::new(text);
        if transcript.is_empty() {
            warn!("Transcript is empty for {}", audio_path.display());
        } else {
            debug!("Transcribed {} characters", transcript.text.len());
        }

        Ok(transcript)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WhisperModel;

    #[test]
    fn test_missing_model_is_rejected_up_front() {
        let dir = tempfile::tempdir().unwrap();
        let settings = TranscriptionSettings {
            binary: "whisper-cli".to_string(),
            model_dir: dir.path().to_string_lossy().to_string(),
            model: WhisperModel::Tiny,
            language: None,
        };

        let err = WhisperCliTranscriber::new(&settings).unwrap_err();
        assert!(err.to_string().contains("ggml-tiny.bin"));
    }

    #[test]
    fn test_model_file_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ggml-tiny.bin"), b"stub").unwrap();

        let settings = TranscriptionSettings {
            binary: "whisper-cli".to_string(),
            model_dir: dir.path().to_string_lossy().to_string(),
            model: WhisperModel::Tiny,
            language: Some("en".to_string()),
        };

        assert!(WhisperCliTranscriber::new(&settings).is_ok());
    }
}
