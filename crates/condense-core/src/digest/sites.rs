use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A news site and its feed
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeedSite {
    pub name: String,
    pub rss: String,
    pub category: String,
}

impl FeedSite {
    pub fn new(name: &str, rss: &str, category: &str) -> Self {
        Self {
            name: name.to_string(),
            rss: rss.to_string(),
            category: category.to_string(),
        }
    }
}

/// Built-in catalog of AI news feeds
pub fn default_sites() -> Vec<FeedSite> {
    const AI_NEWS_FEED: &str = "https://www.artificialintelligence-news.com/feed/";

    vec![
        FeedSite::new("MIT Technology Review", "https://www.technologyreview.com/feed/", "Research"),
        FeedSite::new("TechCrunch AI", "https://techcrunch.com/tag/ai/feed/", "Business"),
        FeedSite::new(
            "Ars Technica",
            "https://feeds.arstechnica.com/arstechnica/technology-lab/",
            "Technology",
        ),
        FeedSite::new(
            "ZDNet AI",
            "https://www.zdnet.com/topic/artificial-intelligence/rss.xml",
            "Enterprise",
        ),
        FeedSite::new("AI News", AI_NEWS_FEED, "Industry"),
        FeedSite::new("Towards Data Science", "https://towardsdatascience.com/feed", "Research"),
        FeedSite::new("OpenAI Blog", "https://openai.com/blog/rss.xml", "Research"),
        FeedSite::new("Hugging Face Blog", "https://huggingface.co/blog/feed.xml", "Research"),
        FeedSite::new("AI Research", AI_NEWS_FEED, "Research"),
        FeedSite::new(
            "Machine Learning Mastery",
            "https://machinelearningmastery.com/feed/",
            "Research",
        ),
        FeedSite::new("AI Weekly", "https://aiweekly.co/issues.rss", "Newsletter"),
        FeedSite::new("AI News Daily", AI_NEWS_FEED, "Industry"),
        FeedSite::new("AI Business Weekly", AI_NEWS_FEED, "Business"),
        FeedSite::new("AI Time Journal", "https://www.aitimejournal.com/feed/", "Industry"),
        FeedSite::new("AI Research Hub", AI_NEWS_FEED, "Research"),
    ]
}

/// Load a site catalog from a JSON array of `{name, rss, category}`
pub fn load_sites(path: &Path) -> Result<Vec<FeedSite>> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
