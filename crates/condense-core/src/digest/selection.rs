//! Picking active sites and their top articles

use chrono::{DateTime, Duration, Utc};

use super::sites::FeedSite;
use super::types::{ActiveSite, Article, FeedEntry, NO_LINK, NO_SUMMARY, UNTITLED};

/// Count recent entries among the first `probe` of a feed.
///
/// An entry is recent when its parsed date falls within `window` before
/// `now`. Entries without a parseable date are not counted. A window
/// reaching past the earliest representable time counts every dated entry.
pub fn count_recent(
    entries: &[FeedEntry],
    now: DateTime<Utc>,
    window: Duration,
    probe: usize,
) -> usize {
    let cutoff = now
        .checked_sub_signed(window)
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    entries
        .iter()
        .take(probe)
        .filter(|entry| entry.published_at.is_some_and(|at| at > cutoff))
        .count()
}

/// Keep sites with recent entries, most active first, at most `max_sites`.
///
/// Sites with equal activity keep their catalog order.
pub fn rank_sites(mut sites: Vec<ActiveSite>, max_sites: usize) -> Vec<ActiveSite> {
    sites.retain(|s| s.recent_articles > 0);
    sites.sort_by(|a, b| b.recent_articles.cmp(&a.recent_articles));
    sites.truncate(max_sites);
    sites
}

/// Take the first `per_site` entries of a feed as articles
pub fn collect_articles(site: &FeedSite, entries: &[FeedEntry], per_site: usize) -> Vec<Article> {
    entries
        .iter()
        .take(per_site)
        .map(|entry| Article {
            title: non_blank(&entry.title).unwrap_or(UNTITLED).to_string(),
            link: non_blank(&entry.link).unwrap_or(NO_LINK).to_string(),
            published: entry.published.clone().unwrap_or_default(),
            summary: non_blank(&entry.summary)
                .or_else(|| non_blank(&entry.description))
                .unwrap_or(NO_SUMMARY)
                .to_string(),
            source: site.name.clone(),
            category: site.category.clone(),
        })
        .collect()
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}
