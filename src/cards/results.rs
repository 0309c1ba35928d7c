//! Per-episode card results store.
//!
//! A JSON map from episode id to generated key points. Lets the `cards`
//! command resume after an interrupted run without re-querying the LLM for
//! episodes that already have results.

use super::KeyPoint;
use crate::error::Result;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The on-disk results store.
pub struct CardResults {
    path: PathBuf,
    results: BTreeMap<String, Vec<KeyPoint>>,
}

impl CardResults {
    /// Load the store from disk. A missing file yields an empty store.
    pub fn load(path: &Path) -> Result<Self> {
        let results = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str(&content)?
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path: path.to_path_buf(),
            results,
        })
    }

    /// Write the store back to disk.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.results)?;
        std::fs::write(&self.path, content)?;
        debug!("Saved results for {} episodes", self.results.len());
        Ok(())
    }

    pub fn contains(&self, episode_id: &str) -> bool {
        self.results.contains_key(episode_id)
    }

    pub fn insert(&mut self, episode_id: &str, points: Vec<KeyPoint>) {
        self.results.insert(episode_id.to_string(), points);
    }

    pub fn get(&self, episode_id: &str) -> Option<&[KeyPoint]> {
        self.results.get(episode_id).map(|v| v.as_slice())
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("card_results.json");

        let mut store = CardResults::load(&path).unwrap();
        assert!(store.is_empty());

        store.insert(
            "ep-1",
            vec![KeyPoint {
                text: "Spaced repetition works.".to_string(),
                quotes: vec!["Retention collapses without review.".to_string()],
            }],
        );
        store.save().unwrap();

        let reloaded = CardResults::load(&path).unwrap();
        assert!(reloaded.contains("ep-1"));
        assert_eq!(reloaded.get("ep-1").unwrap()[0].quotes.len(), 1);
        assert_eq!(reloaded.len(), 1);
    }
}
