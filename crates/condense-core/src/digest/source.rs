use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;

use super::sites::FeedSite;
use super::types::FeedEntry;
use crate::error::{Error, Result};

/// Supplies the entries of a site's feed, newest first
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self, site: &FeedSite) -> Result<Vec<FeedEntry>>;
}

#[derive(Debug, Deserialize)]
struct Snapshot {
    feeds: HashMap<String, Vec<FeedEntry>>,
}

/// Serves feeds from a JSON snapshot captured earlier
///
/// The snapshot maps feed URLs to their entries:
///
/// ```json
/// { "feeds": { "https://example.com/feed": [ { "title": "...", "published": "..." } ] } }
/// ```
#[derive(Debug, Clone, Default)]
pub struct SnapshotFeedSource {
    feeds: HashMap<String, Vec<FeedEntry>>,
}

impl SnapshotFeedSource {
    pub fn from_json(raw: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(raw)?;
        let feeds = snapshot
            .feeds
            .into_iter()
            .map(|(url, entries)| {
                let entries = entries.into_iter().map(FeedEntry::with_parsed_date).collect();
                (url, entries)
            })
            .collect();
        Ok(Self { feeds })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn len(&self) -> usize {
        self.feeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feeds.is_empty()
    }
}

#[async_trait]
impl FeedSource for SnapshotFeedSource {
    async fn fetch(&self, site: &FeedSite) -> Result<Vec<FeedEntry>> {
        self.feeds
            .get(&site.rss)
            .cloned()
            .ok_or_else(|| Error::Other(format!("feed {} is not in the snapshot", site.rss)))
    }
}
