//! Cards command implementation.

use crate::cards::{collect_rows, write_csv, CardGenerator, CardResults};
use crate::catalog::Catalog;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::{Prompts, Settings};
use crate::transcription::Transcript;
use anyhow::Result;

/// Run the cards command.
pub async fn run_cards(yes: bool, model: Option<String>, settings: Settings) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Cards, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'lyttekort doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let catalog = Catalog::load(&settings.episodes_json_path())?;
    if catalog.is_empty() {
        Output::warning("Catalog is empty. Run 'lyttekort sync' first.");
        return Ok(());
    }

    let mut results = CardResults::load(&settings.card_results_path())?;

    // Episodes with a transcript on disk but no stored result yet
    let pending: Vec<(&crate::catalog::Episode, std::path::PathBuf)> = catalog
        .episodes()
        .iter()
        .filter(|e| !results.contains(&e.id))
        .filter_map(|e| {
            e.transcript_file
                .as_ref()
                .filter(|p| p.exists())
                .map(|p| (e, p.clone()))
        })
        .collect();

    if pending.is_empty() {
        Output::info("All transcribed episodes already have card results.");
    } else {
        Output::info(&format!(
            "{} episodes need summarizing",
            pending.len()
        ));

        if !yes && !Output::confirm("Send transcripts to the LLM now?")? {
            Output::info("Aborted.");
            return Ok(());
        }

        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;
        let generator = CardGenerator::new(&settings.cards, model).with_prompts(prompts);

        for (episode, transcript_path) in pending {
            let transcript = Transcript::load(&transcript_path)?;

            let spinner = Output::spinner(&format!("Summarizing '{}'...", episode.episode_title));
            let points = generator.generate(episode, &transcript.text).await?;
            spinner.finish_and_clear();

            Output::success(&format!(
                "'{}': {} key points",
                episode.episode_title,
                points.len()
            ));

            // Save after every episode so an interrupted run resumes cleanly
            results.insert(&episode.id, points);
            results.save()?;
        }
    }

    let rows = collect_rows(&catalog, &results);
    let csv_path = settings.csv_path();
    write_csv(&csv_path, &rows)?;

    Output::success(&format!(
        "Wrote {} flashcards to {}",
        rows.len(),
        csv_path.display()
    ));

    Ok(())
}
