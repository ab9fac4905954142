//! News digest: pick active feeds, summarize their top articles, render HTML
//!
//! - `sites`: feed catalog
//! - `source`: the [`FeedSource`] seam and a JSON snapshot implementation
//! - `selection`: recency counting, site ranking, article collection
//! - `render`: HTML output
//! - `builder`: the end-to-end pipeline

mod builder;
mod render;
mod selection;
mod sites;
mod source;
mod types;

pub use builder::{Digest, DigestBuilder, DigestOptions, strip_html};
pub use render::{escape_html, group_by_source, render_digest};
pub use selection::{collect_articles, count_recent, rank_sites};
pub use sites::{FeedSite, default_sites, load_sites};
pub use source::{FeedSource, SnapshotFeedSource};
pub use types::{
    ActiveSite, Article, FeedEntry, NO_LINK, NO_SUMMARY, SummarizedArticle, UNTITLED,
    parse_published,
};
