//! gpodder episode-action API client.
//!
//! Talks to a gpodder-compatible sync server over its JSON API
//! (`/api/2/episodes/<username>.json`) using basic authentication.

use crate::error::{LyttekortError, Result};
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

/// A single episode action reported by the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeAction {
    /// Podcast feed URL.
    pub podcast: String,
    /// Episode media URL.
    pub episode: String,
    /// Feed-level GUID of the episode, when the server knows it.
    #[serde(default)]
    pub guid: Option<String>,
    /// Action type ("play", "download", "delete", ...).
    pub action: String,
    /// Action timestamp, `%Y-%m-%dT%H:%M:%SZ`.
    pub timestamp: String,
    /// Playback position in seconds (play actions).
    #[serde(default)]
    pub position: Option<i64>,
    /// Total episode length in seconds (play actions).
    #[serde(default)]
    pub total: Option<i64>,
}

impl EpisodeAction {
    /// Whether this action records a fully played-back episode.
    pub fn is_finished_play(&self) -> bool {
        self.action == "play"
            && matches!((self.position, self.total), (Some(p), Some(t)) if p == t && t > 0)
    }

    /// Identifier used to key local files: the feed GUID when present,
    /// otherwise the media URL.
    pub fn episode_id(&self) -> &str {
        self.guid.as_deref().unwrap_or(&self.episode)
    }
}

/// Response of the episode-actions endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct EpisodeActionsResponse {
    pub actions: Vec<EpisodeAction>,
    /// Server timestamp to pass as `since` on the next sync.
    pub timestamp: i64,
}

/// Client for the gpodder episode-action API.
pub struct GpodderClient {
    http: reqwest::Client,
    base_url: Url,
    username: String,
    password: String,
    device: Option<String>,
}

impl GpodderClient {
    /// Create a client for the given server and account.
    pub fn new(
        base_url: &str,
        username: &str,
        password: &str,
        device: Option<String>,
    ) -> Result<Self> {
        if username.is_empty() {
            return Err(LyttekortError::Config(
                "gpodder username is not configured".to_string(),
            ));
        }

        let base_url = Url::parse(base_url)
            .map_err(|e| LyttekortError::Config(format!("Invalid gpodder base URL: {}", e)))?;

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()?;

        Ok(Self {
            http,
            base_url,
            username: username.to_string(),
            password: password.to_string(),
            device,
        })
    }

    /// Fetch episode actions for the account, optionally since a server timestamp.
    #[instrument(skip(self))]
    pub async fn episode_actions(&self, since: Option<i64>) -> Result<EpisodeActionsResponse> {
        let mut endpoint = self
            .base_url
            .join(&format!("api/2/episodes/{}.json", self.username))
            .map_err(|e| LyttekortError::Config(format!("Invalid gpodder endpoint: {}", e)))?;

        {
            let mut query = endpoint.query_pairs_mut();
            if let Some(since) = since {
                query.append_pair("since", &since.to_string());
            }
            if let Some(device) = &self.device {
                query.append_pair("device", device);
            }
        }

        debug!("Fetching episode actions from {}", endpoint);

        let response = self
            .http
            .get(endpoint)
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LyttekortError::Gpodder(format!(
                "Failed to fetch episode actions: {} {}",
                status, body
            )));
        }

        let parsed: EpisodeActionsResponse = response.json().await?;
        debug!("Received {} actions", parsed.actions.len());
        Ok(parsed)
    }
}

/// Keep only fully listened play actions.
pub fn finished_episodes(actions: &[EpisodeAction]) -> Vec<&EpisodeAction> {
    actions.iter().filter(|a| a.is_finished_play()).collect()
}

/// Format an action timestamp for the catalog, shifted by a fixed UTC offset.
pub fn format_listened_at(timestamp: &str, utc_offset_hours: i32) -> Result<String> {
    let parsed = NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%SZ")
        .map_err(|e| LyttekortError::Gpodder(format!("Bad action timestamp '{}': {}", timestamp, e)))?;
    let shifted = parsed + Duration::hours(utc_offset_hours as i64);
    Ok(shifted.format("%d.%m.%Y %H:%M").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(position: Option<i64>, total: Option<i64>) -> EpisodeAction {
        EpisodeAction {
            podcast: "https://example.org/feed.xml".to_string(),
            episode: "https://example.org/ep1.mp3".to_string(),
            guid: Some("ep-1".to_string()),
            action: "play".to_string(),
            timestamp: "2024-03-01T08:30:00Z".to_string(),
            position,
            total,
        }
    }

    #[test]
    fn test_finished_filter_keeps_complete_plays_only() {
        let mut download = play(None, None);
        download.action = "download".to_string();

        let actions = vec![
            play(Some(3600), Some(3600)),
            play(Some(120), Some(3600)),
            play(None, Some(3600)),
            download,
        ];

        let finished = finished_episodes(&actions);
        assert_eq!(finished.len(), 1);
        assert_eq!(finished[0].position, Some(3600));
    }

    #[test]
    fn test_zero_length_episode_is_not_finished() {
        assert!(!play(Some(0), Some(0)).is_finished_play());
    }

    #[test]
    fn test_episode_id_falls_back_to_media_url() {
        let mut action = play(Some(10), Some(10));
        action.guid = None;
        assert_eq!(action.episode_id(), "https://example.org/ep1.mp3");
    }

    #[test]
    fn test_format_listened_at_applies_offset() {
        let formatted = format_listened_at("2024-03-01T22:30:00Z", 7).unwrap();
        assert_eq!(formatted, "02.03.2024 05:30");

        let unshifted = format_listened_at("2024-03-01T22:30:00Z", 0).unwrap();
        assert_eq!(unshifted, "01.03.2024 22:30");
    }

    #[test]
    fn test_response_parses() {
        let json = r#"{
            "actions": [
                {
                    "podcast": "https://example.org/feed.xml",
                    "episode": "https://example.org/ep1.mp3",
                    "guid": "ep-1",
                    "action": "play",
                    "timestamp": "2024-03-01T08:30:00Z",
                    "position": 100,
                    "total": 100
                },
                {
                    "podcast": "https://example.org/feed.xml",
                    "episode": "https://example.org/ep2.mp3",
                    "action": "download",
                    "timestamp": "2024-03-01T08:31:00Z"
                }
            ],
            "timestamp": 1709280660
        }"#;

        let response: EpisodeActionsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.actions.len(), 2);
        assert_eq!(response.timestamp, 1709280660);
        assert!(response.actions[0].is_finished_play());
        assert!(response.actions[1].guid.is_none());
    }
}
