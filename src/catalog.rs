//! Local episode catalog.
//!
//! The catalog is a JSON file shared by all pipeline stages: `sync` creates
//! entries, `transcribe` fills in transcript paths, `cards` reads metadata
//! for the CSV export. Duplicate GUIDs are collapsed on save, latest wins.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A podcast episode known to the pipeline.
///
/// Identity fields are set once by `sync`; the optional file paths are
/// filled in as the later stages run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Episode {
    /// Feed GUID (or media URL when the server reports no GUID).
    pub id: String,
    pub episode_title: String,
    pub podcast_title: String,
    pub author: String,
    /// Episode media URL.
    pub audio_url: String,
    /// When the episode was finished, formatted for display.
    pub listened_at: String,
    /// Local audio file, once downloaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_file: Option<PathBuf>,
    /// Local transcript file, once transcribed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript_file: Option<PathBuf>,
}

impl Episode {
    /// File stem used for this episode's audio and transcript files.
    pub fn file_stem(&self) -> String {
        sanitize_id(&self.id)
    }
}

/// Map an episode id (often a URL) to a filesystem-safe file stem.
pub fn sanitize_id(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// The on-disk episode catalog.
pub struct Catalog {
    path: PathBuf,
    episodes: Vec<Episode>,
}

impl Catalog {
    /// Load the catalog from disk. A missing file yields an empty catalog.
    pub fn load(path: &Path) -> Result<Self> {
        let episodes = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str(&content)?
        } else {
            Vec::new()
        };

        Ok(Self {
            path: path.to_path_buf(),
            episodes,
        })
    }

    /// Write the catalog back to disk, deduplicated.
    pub fn save(&mut self) -> Result<()> {
        self.dedup();

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.episodes)?;
        std::fs::write(&self.path, content)?;
        debug!("Saved {} episodes to {}", self.episodes.len(), self.path.display());
        Ok(())
    }

    /// Insert an episode, replacing any existing entry with the same id.
    ///
    /// Local file state survives a re-observed episode.
    pub fn upsert(&mut self, mut episode: Episode) {
        match self.episodes.iter_mut().find(|e| e.id == episode.id) {
            Some(existing) => {
                if episode.audio_file.is_none() {
                    episode.audio_file = existing.audio_file.take();
                }
                if episode.transcript_file.is_none() {
                    episode.transcript_file = existing.transcript_file.take();
                }
                *existing = episode;
            }
            None => self.episodes.push(episode),
        }
    }

    /// Collapse duplicate ids, keeping the latest occurrence.
    pub fn dedup(&mut self) {
        let mut latest: HashMap<String, Episode> = HashMap::new();
        let mut order: Vec<String> = Vec::new();

        for episode in self.episodes.drain(..) {
            if !latest.contains_key(&episode.id) {
                order.push(episode.id.clone());
            }
            latest.insert(episode.id.clone(), episode);
        }

        self.episodes = order
            .into_iter()
            .filter_map(|id| latest.remove(&id))
            .collect();
    }

    pub fn episodes(&self) -> &[Episode] {
        &self.episodes
    }

    pub fn episodes_mut(&mut self) -> &mut [Episode] {
        &mut self.episodes
    }

    pub fn get(&self, id: &str) -> Option<&Episode> {
        self.episodes.iter().find(|e| e.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }
}

/// Read the persisted sync timestamp. A missing file means "full sync".
pub fn load_last_timestamp(path: &Path) -> Option<i64> {
    let content = std::fs::read_to_string(path).ok()?;
    content.trim().parse().ok()
}

/// Persist the server timestamp for the next incremental sync.
pub fn save_last_timestamp(path: &Path, timestamp: i64) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, timestamp.to_string())?;
    Ok(())
}
