//! Transcribe command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::catalog::Catalog;
use crate::config::Settings;
use crate::transcription::{Transcriber, WhisperCliTranscriber};
use anyhow::Result;

/// Run the transcribe command.
pub async fn run_transcribe(force: bool, settings: Settings) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Transcribe, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'lyttekort doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let mut catalog = Catalog::load(&settings.episodes_json_path())?;
    if catalog.is_empty() {
        Output::warning("Catalog is empty. Run 'lyttekort sync' first.");
        return Ok(());
    }

    let transcriber = WhisperCliTranscriber::new(&settings.transcription)?;
    let transcripts_dir = settings.transcripts_dir();

    Output::info(&format!(
        "Transcribing with whisper model '{}'",
        settings.transcription.model
    ));

    let mut transcribed = 0;
    let mut skipped = 0;
    let mut failed = 0;

    for episode in catalog.episodes_mut() {
        let Some(audio_path) = episode.audio_file.clone() else {
            Output::warning(&format!(
                "'{}' has no downloaded audio; run 'lyttekort sync'",
                episode.episode_title
            ));
            continue;
        };

        let transcript_path = transcripts_dir.join(format!("{}.txt", episode.file_stem()));

        if transcript_path.exists() && !force {
            episode.transcript_file = Some(transcript_path);
            skipped += 1;
            continue;
        }

        Output::info(&format!("Transcribing '{}'", episode.episode_title));

        match transcriber.transcribe(&audio_path).await {
            Ok(transcript) => {
                transcript.save(&transcript_path)?;
                episode.transcript_file = Some(transcript_path);
                transcribed += 1;
            }
            Err(e) => {
                Output::error(&format!(
                    "Failed to transcribe '{}': {}",
                    episode.episode_title, e
                ));
                failed += 1;
            }
        }
    }

    catalog.save()?;

    if failed > 0 {
        Output::warning(&format!(
            "{} transcribed, {} skipped, {} failed",
            transcribed, skipped, failed
        ));
    } else {
        Output::success(&format!("{} transcribed, {} skipped", transcribed, skipped));
    }

    Ok(())
}
