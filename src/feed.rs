//! Podcast feed metadata lookup.
//!
//! The gpodder action stream only carries URLs and GUIDs; episode and
//! podcast titles come from the podcast's own RSS/Atom feed. Feeds are
//! fetched once per run and cached in memory, since one feed typically
//! covers many episodes.

use crate::error::{LyttekortError, Result};
use feed_rs::model::Feed;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Metadata extracted from a podcast feed for a single episode.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeDetails {
    pub episode_title: String,
    pub author: String,
    pub podcast_title: String,
}

/// Resolves episode metadata from podcast feeds, caching parsed feeds per run.
pub struct FeedResolver {
    http: reqwest::Client,
    cache: HashMap<String, Feed>,
}

impl FeedResolver {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            cache: HashMap::new(),
        }
    }

    /// Look up episode metadata by feed URL and entry GUID.
    #[instrument(skip(self))]
    pub async fn episode_details(&mut self, feed_url: &str, guid: &str) -> Result<EpisodeDetails> {
        if !self.cache.contains_key(feed_url) {
            let feed = self.fetch_feed(feed_url).await?;
            self.cache.insert(feed_url.to_string(), feed);
        }

        let feed = self
            .cache
            .get(feed_url)
            .ok_or_else(|| LyttekortError::Feed(format!("Feed cache miss for {}", feed_url)))?;

        details_from_feed(feed, guid)
    }

    async fn fetch_feed(&self, feed_url: &str) -> Result<Feed> {
        debug!("Fetching podcast feed {}", feed_url);

        let response = self.http.get(feed_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LyttekortError::Feed(format!(
                "Failed to fetch feed {}: {}",
                feed_url, status
            )));
        }

        let bytes = response.bytes().await?;
        feed_rs::parser::parse(&bytes[..])
            .map_err(|e| LyttekortError::Feed(format!("Failed to parse feed {}: {}", feed_url, e)))
    }
}

impl Default for FeedResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract details for the entry whose id matches `guid`.
fn details_from_feed(feed: &Feed, guid: &str) -> Result<EpisodeDetails> {
    let podcast_title = feed
        .title
        .as_ref()
        .map(|t| t.content.clone())
        .unwrap_or_else(|| "Unknown Podcast".to_string());

    let entry = feed
        .entries
        .iter()
        .find(|e| e.id == guid)
        .ok_or_else(|| LyttekortError::EpisodeNotFound(guid.to_string()))?;

    let episode_title = entry
        .title
        .as_ref()
        .map(|t| t.content.clone())
        .unwrap_or_else(|| "Unknown Episode".to_string());

    // Entry author first, feed author as fallback
    let author = entry
        .authors
        .first()
        .or_else(|| feed.authors.first())
        .map(|p| p.name.clone())
        .unwrap_or_else(|| "Unknown Author".to_string());

    Ok(EpisodeDetails {
        episode_title,
        author,
        podcast_title,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Example Show</title>
    <item>
      <guid>ep-1</guid>
      <title>First Episode</title>
      <author>Jane Host</author>
      <enclosure url="https://example.org/ep1.mp3" type="audio/mpeg" length="1"/>
    </item>
    <item>
      <guid>ep-2</guid>
      <title>Second Episode</title>
      <enclosure url="https://example.org/ep2.mp3" type="audio/mpeg" length="1"/>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn test_details_from_feed() {
        let feed = feed_rs::parser::parse(FEED.as_bytes()).unwrap();
        let details = details_from_feed(&feed, "ep-1").unwrap();
        assert_eq!(
            details,
            EpisodeDetails {
                episode_title: "First Episode".to_string(),
                author: "Jane Host".to_string(),
                podcast_title: "Example Show".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_author_falls_back() {
        let feed = feed_rs::parser::parse(FEED.as_bytes()).unwrap();
        let details = details_from_feed(&feed, "ep-2").unwrap();
        assert_eq!(details.author, "Unknown Author");
        assert_eq!(details.podcast_title, "Example Show");
    }

    #[test]
    fn test_unknown_guid_is_an_error() {
        let feed = feed_rs::parser::parse(FEED.as_bytes()).unwrap();
        assert!(details_from_feed(&feed, "ep-404").is_err());
    }
}
