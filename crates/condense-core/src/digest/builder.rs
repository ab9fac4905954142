//! End-to-end digest assembly

use std::sync::LazyLock;

use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::render::render_digest;
use super::selection::{collect_articles, count_recent, rank_sites};
use super::sites::FeedSite;
use super::source::FeedSource;
use super::types::{ActiveSite, NO_SUMMARY, SummarizedArticle};
use crate::config::{DigestConfig, MAX_RECENT_DAYS};
use crate::error::{Error, Result};
use crate::summarize::{SummaryBounds, SummaryStage, Summarizer};

static TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex (verified by tests)"));

static SPACE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex (verified by tests)"));

/// Drop markup from feed text and collapse whitespace
pub fn strip_html(text: &str) -> String {
    let without_tags = TAG_REGEX.replace_all(text, " ");
    SPACE_REGEX.replace_all(&without_tags, " ").trim().to_string()
}

/// Selection and summary settings for a digest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigestOptions {
    pub max_sites: usize,
    pub articles_per_site: usize,
    pub recent_days: i64,
    /// How many leading entries of each feed are checked for recency
    pub probe_entries: usize,
    pub summary_bounds: SummaryBounds,
}

impl Default for DigestOptions {
    fn default() -> Self {
        Self::from(&DigestConfig::default())
    }
}

impl From<&DigestConfig> for DigestOptions {
    fn from(config: &DigestConfig) -> Self {
        Self {
            max_sites: config.max_sites,
            articles_per_site: config.articles_per_site,
            recent_days: config.recent_days,
            probe_entries: config.probe_entries,
            summary_bounds: SummaryBounds::new(
                config.summary_max_length,
                config.summary_min_length,
            ),
        }
    }
}

/// A rendered digest with the data behind it
#[derive(Debug, Clone, Serialize)]
pub struct Digest {
    pub generated_at: DateTime<Utc>,
    pub sites: Vec<ActiveSite>,
    pub articles: Vec<SummarizedArticle>,
    #[serde(skip)]
    pub html: String,
}

/// Probes feeds, picks the most active sites and summarizes their top articles
pub struct DigestBuilder<S, F> {
    summarizer: S,
    feeds: F,
    sites: Vec<FeedSite>,
    options: DigestOptions,
}

impl<S: Summarizer, F: FeedSource> DigestBuilder<S, F> {
    pub fn new(summarizer: S, feeds: F, sites: Vec<FeedSite>, options: DigestOptions) -> Self {
        Self {
            summarizer,
            feeds,
            sites,
            options,
        }
    }

    /// Probe every site and return the active ones, ranked
    pub async fn active_sites(&self, now: DateTime<Utc>) -> Vec<ActiveSite> {
        let window = Duration::days(self.options.recent_days.clamp(0, MAX_RECENT_DAYS));
        let mut probed = Vec::with_capacity(self.sites.len());

        for site in &self.sites {
            let entries = match self.feeds.fetch(site).await {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(site = %site.name, error = %e, "Skipping site, feed unavailable");
                    continue;
                }
            };

            if entries.is_empty() {
                debug!(site = %site.name, "Skipping site, feed is empty");
                continue;
            }

            let recent = count_recent(&entries, now, window, self.options.probe_entries);
            debug!(site = %site.name, recent = recent, total = entries.len(), "Probed feed");
            probed.push(ActiveSite {
                site: site.clone(),
                recent_articles: recent,
                total_articles: entries.len(),
                entries,
            });
        }

        rank_sites(probed, self.options.max_sites)
    }

    /// Build the digest as of `now`.
    ///
    /// Fails with [`Error::EmptyInput`] when no site is active or no article
    /// was found. Article summaries are requested one at a time; the first
    /// failure aborts the build.
    pub async fn build(&self, now: DateTime<Utc>) -> Result<Digest> {
        let sites = self.active_sites(now).await;
        if sites.is_empty() {
            return Err(Error::EmptyInput(
                "digest: no feed has recent articles".to_string(),
            ));
        }
        info!(sites = sites.len(), "Selected active sites");

        let articles: Vec<_> = sites
            .iter()
            .flat_map(|active| {
                collect_articles(&active.site, &active.entries, self.options.articles_per_site)
            })
            .collect();
        if articles.is_empty() {
            return Err(Error::EmptyInput("digest: no articles found".to_string()));
        }

        let mut summarized = Vec::with_capacity(articles.len());
        for (index, article) in articles.into_iter().enumerate() {
            let text = strip_html(&article.summary);
            let digest_summary = if text.is_empty() || text == NO_SUMMARY {
                NO_SUMMARY.to_string()
            } else {
                debug!(title = %article.title, "Summarizing article");
                self.summarizer
                    .summarize(&text, self.options.summary_bounds)
                    .await
                    .map_err(|source| Error::OracleFailure {
                        stage: SummaryStage::Article(index),
                        source: Box::new(source),
                    })?
                    .trim()
                    .to_string()
            };
            summarized.push(SummarizedArticle {
                article,
                digest_summary,
            });
        }

        let html = render_digest(now.date_naive(), &summarized);
        info!(articles = summarized.len(), "Digest built");

        Ok(Digest {
            generated_at: now,
            sites,
            articles: summarized,
            html,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::types::FeedEntry;
    use crate::summarize::testing::RecordingSummarizer;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::collections::HashMap;

    struct MapFeeds(HashMap<String, Vec<FeedEntry>>);

    #[async_trait]
    impl FeedSource for MapFeeds {
        async fn fetch(&self, site: &FeedSite) -> Result<Vec<FeedEntry>> {
            self.0
                .get(&site.rss)
                .cloned()
                .ok_or_else(|| Error::Other("offline".to_string()))
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 18, 12, 0, 0).unwrap()
    }

    fn entry(title: &str, days_ago: i64) -> FeedEntry {
        FeedEntry {
            title: Some(title.to_string()),
            link: Some(format!("https://example.com/{}", title)),
            published_at: Some(now() - Duration::days(days_ago)),
            summary: Some(format!("<p>Story about <b>{}</b>.</p>", title)),
            ..FeedEntry::default()
        }
    }

    fn site(name: &str) -> FeedSite {
        FeedSite::new(name, &format!("https://{}.example/feed", name), "Research")
    }

    fn feeds(entries: Vec<(&str, Vec<FeedEntry>)>) -> MapFeeds {
        MapFeeds(
            entries
                .into_iter()
                .map(|(name, list)| (site(name).rss, list))
                .collect(),
        )
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(strip_html("<p>Hello <b>world</b></p>\n\n more"), "Hello world more");
        assert_eq!(strip_html("   "), "");
    }

    #[test]
    fn test_options_from_config() {
        let options = DigestOptions::default();
        assert_eq!(options.max_sites, 10);
        assert_eq!(options.articles_per_site, 2);
        assert_eq!(options.summary_bounds, SummaryBounds::new(90, 30));
    }

    #[tokio::test]
    async fn test_build_digest() {
        let oracle = RecordingSummarizer::new(|i, _| Ok(format!("summary {}", i)));
        let builder = DigestBuilder::new(
            oracle.clone(),
            feeds(vec![
                ("slow", vec![entry("old", 1), entry("older", 30)]),
                ("busy", vec![entry("a", 1), entry("b", 2), entry("c", 3)]),
                ("dead", vec![entry("ancient", 100)]),
            ]),
            vec![site("slow"), site("busy"), site("dead"), site("offline")],
            DigestOptions::default(),
        );

        let digest = builder.build(now()).await.unwrap();

        let names: Vec<_> = digest.sites.iter().map(|s| s.site.name.as_str()).collect();
        assert_eq!(names, vec!["busy", "slow"]);

        let titles: Vec<_> = digest
            .articles
            .iter()
            .map(|a| a.article.title.as_str())
            .collect();
        assert_eq!(titles, vec!["a", "b", "old", "older"]);
        assert_eq!(digest.articles[0].digest_summary, "summary 0");

        let calls = oracle.calls();
        assert_eq!(calls.len(), 4);
        assert_eq!(calls[0].0, "Story about a .");
        assert_eq!(calls[0].1, SummaryBounds::new(90, 30));

        assert!(digest.html.contains("Top 4 Articles from 2 Sources"));
    }

    #[tokio::test]
    async fn test_oversized_recent_days_is_clamped() {
        let options = DigestOptions {
            recent_days: i64::MAX,
            ..DigestOptions::default()
        };
        let builder = DigestBuilder::new(
            RecordingSummarizer::echo(),
            feeds(vec![("busy", vec![entry("a", 1), entry("b", 4000)])]),
            vec![site("busy")],
            options,
        );

        let sites = builder.active_sites(now()).await;
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].recent_articles, 1);
    }

    #[tokio::test]
    async fn test_no_active_sites() {
        let oracle = RecordingSummarizer::echo();
        let builder = DigestBuilder::new(
            oracle.clone(),
            feeds(vec![("dead", vec![entry("ancient", 100)])]),
            vec![site("dead")],
            DigestOptions::default(),
        );

        let err = builder.build(now()).await.unwrap_err();
        assert!(matches!(err, Error::EmptyInput(_)));
        assert_eq!(oracle.call_count(), 0);
    }

    #[tokio::test]
    async fn test_article_without_summary_skips_oracle() {
        let oracle = RecordingSummarizer::echo();
        let bare = FeedEntry {
            title: Some("bare".to_string()),
            published_at: Some(now()),
            ..FeedEntry::default()
        };
        let builder = DigestBuilder::new(
            oracle.clone(),
            feeds(vec![("only", vec![bare])]),
            vec![site("only")],
            DigestOptions::default(),
        );

        let digest = builder.build(now()).await.unwrap();
        assert_eq!(digest.articles[0].digest_summary, NO_SUMMARY);
        assert_eq!(oracle.call_count(), 0);
    }

    #[tokio::test]
    async fn test_summarizer_failure_aborts() {
        let oracle = RecordingSummarizer::new(|_, _| Err(Error::LLMError("down".to_string())));
        let builder = DigestBuilder::new(
            oracle,
            feeds(vec![("busy", vec![entry("a", 1)])]),
            vec![site("busy")],
            DigestOptions::default(),
        );

        let err = builder.build(now()).await.unwrap_err();
        assert!(matches!(
            err,
            Error::OracleFailure {
                stage: SummaryStage::Article(0),
                ..
            }
        ));
        assert!(matches!(err.root(), Error::LLMError(_)));
    }
}
