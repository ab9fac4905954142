//! The summarization seam
//!
//! Anything that can turn text into a shorter text implements [`Summarizer`].
//! The LLM-backed implementation lives in `crate::llm`; tests use fakes.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Length bounds passed to the summarizer, in model tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryBounds {
    pub max_length: usize,
    pub min_length: usize,
}

impl SummaryBounds {
    pub const fn new(max_length: usize, min_length: usize) -> Self {
        Self {
            max_length,
            min_length,
        }
    }
}

/// Where in the chunked pipeline a summarizer call happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryStage {
    /// Per-chunk pass, with the zero-based chunk index
    Chunk(usize),
    /// Final pass over the joined partial summaries
    Combine,
    /// Standalone single-pass summary
    Single,
    /// Digest article, with its zero-based position in the digest
    Article(usize),
}

impl fmt::Display for SummaryStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummaryStage::Chunk(index) => write!(f, "chunk {}", index + 1),
            SummaryStage::Combine => write!(f, "combine pass"),
            SummaryStage::Single => write!(f, "single pass"),
            SummaryStage::Article(index) => write!(f, "article {}", index + 1),
        }
    }
}

/// Produces a summary of a piece of text
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarize `text` within `bounds`. Any failure is surfaced as-is.
    async fn summarize(&self, text: &str, bounds: SummaryBounds) -> Result<String>;
}

#[async_trait]
impl<T: Summarizer + ?Sized> Summarizer for Arc<T> {
    async fn summarize(&self, text: &str, bounds: SummaryBounds) -> Result<String> {
        (**self).summarize(text, bounds).await
    }
}

