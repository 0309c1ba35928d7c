//! Sync command implementation.

use crate::audio::download_episode;
use crate::catalog::{load_last_timestamp, save_last_timestamp, Catalog, Episode};
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::feed::FeedResolver;
use crate::gpodder::{finished_episodes, format_listened_at, GpodderClient};
use anyhow::Result;

/// Run the sync command.
pub async fn run_sync(all: bool, local: bool, settings: Settings) -> Result<()> {
    let mut catalog = Catalog::load(&settings.episodes_json_path())?;

    if local {
        print_catalog(&catalog);
        return Ok(());
    }

    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Sync, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'lyttekort doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let password = settings.gpodder.password()?;
    let client = GpodderClient::new(
        &settings.gpodder.base_url,
        &settings.gpodder.username,
        &password,
        settings.gpodder.device.clone(),
    )?;

    let since = if all {
        None
    } else {
        load_last_timestamp(&settings.timestamp_path())
    };

    match since {
        Some(ts) => Output::info(&format!("Fetching episode actions since {}", ts)),
        None => Output::info("Fetching full episode action history"),
    }

    let spinner = Output::spinner("Querying gpodder server...");
    let response = client.episode_actions(since).await?;
    spinner.finish_and_clear();

    let finished = finished_episodes(&response.actions);
    Output::info(&format!(
        "{} finished episodes among {} actions",
        finished.len(),
        response.actions.len()
    ));

    // Enrich with feed metadata; a broken feed skips that episode only
    let mut resolver = FeedResolver::new();
    let mut added = 0;

    for action in finished {
        let id = action.episode_id().to_string();
        let listened_at =
            format_listened_at(&action.timestamp, settings.gpodder.utc_offset_hours)?;

        match resolver.episode_details(&action.podcast, &id).await {
            Ok(details) => {
                catalog.upsert(Episode {
                    id,
                    episode_title: details.episode_title,
                    podcast_title: details.podcast_title,
                    author: details.author,
                    audio_url: action.episode.clone(),
                    listened_at,
                    audio_file: None,
                    transcript_file: None,
                });
                added += 1;
            }
            Err(e) => {
                Output::warning(&format!("Skipping {}: {}", action.episode, e));
            }
        }
    }

    catalog.save()?;
    save_last_timestamp(&settings.timestamp_path(), response.timestamp)?;
    Output::success(&format!(
        "Catalog updated: {} episodes added or refreshed",
        added
    ));

    download_audio(&mut catalog, &settings).await?;
    catalog.save()?;

    Ok(())
}

/// Download audio for every catalog episode that doesn't have it yet.
async fn download_audio(catalog: &mut Catalog, settings: &Settings) -> Result<()> {
    let episodes_dir = settings.episodes_dir();
    let http = reqwest::Client::new();

    let pending = catalog
        .episodes()
        .iter()
        .filter(|e| e.audio_file.as_ref().map(|p| !p.exists()).unwrap_or(true))
        .count();

    if pending == 0 {
        Output::info("All episode audio already downloaded");
        return Ok(());
    }

    let pb = Output::progress_bar(pending as u64, "downloading audio");

    for episode in catalog.episodes_mut() {
        if let Some(path) = &episode.audio_file {
            if path.exists() {
                continue;
            }
        }

        pb.set_message(episode.episode_title.clone());
        let path =
            download_episode(&http, &episode.audio_url, &episode.id, &episodes_dir).await?;
        episode.audio_file = Some(path);
        pb.inc(1);
    }

    pb.finish_and_clear();
    Output::success(&format!("Downloaded audio for {} episodes", pending));
    Ok(())
}

fn print_catalog(catalog: &Catalog) {
    if catalog.is_empty() {
        Output::warning("Catalog is empty. Run 'lyttekort sync' to fetch episodes.");
        return;
    }

    Output::header("Episode catalog");
    for episode in catalog.episodes() {
        Output::episode_line(
            &episode.episode_title,
            &episode.podcast_title,
            &episode.listened_at,
        );
    }
    println!();
    Output::info(&format!("{} episodes", catalog.episodes().len()));
}
