use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::sites::FeedSite;

pub const UNTITLED: &str = "No Title";
pub const NO_LINK: &str = "#";
pub const NO_SUMMARY: &str = "No summary available";

/// One item of a feed as published by the site
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedEntry {
    pub title: Option<String>,
    pub link: Option<String>,
    /// Publication date exactly as the feed wrote it
    pub published: Option<String>,
    /// Parsed publication date, when the feed's date could be understood
    pub published_at: Option<DateTime<Utc>>,
    pub summary: Option<String>,
    pub description: Option<String>,
}

impl FeedEntry {
    /// Fill `published_at` from `published` when it is missing
    pub fn with_parsed_date(mut self) -> Self {
        if self.published_at.is_none() {
            self.published_at = self.published.as_deref().and_then(parse_published);
        }
        self
    }
}

/// Parse an RSS (RFC 2822) or Atom (RFC 3339) date
pub fn parse_published(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    DateTime::parse_from_rfc2822(text)
        .or_else(|_| DateTime::parse_from_rfc3339(text))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// An article picked for the digest
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    pub title: String,
    pub link: String,
    pub published: String,
    /// Feed-provided summary or description, as published
    pub summary: String,
    pub source: String,
    pub category: String,
}

/// An article together with its generated summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummarizedArticle {
    #[serde(flatten)]
    pub article: Article,
    pub digest_summary: String,
}

/// A site whose feed had recent entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveSite {
    pub site: FeedSite,
    pub recent_articles: usize,
    pub total_articles: usize,
    #[serde(skip)]
    pub entries: Vec<FeedEntry>,
}
