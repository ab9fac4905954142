//! Condense Core Library
//!
//! This crate provides the core functionality for condense, including:
//! - Sentence splitting and bounded chunking of long text
//! - Chunked summarization with a combine pass
//! - LLM integration (OpenAI-compatible chat completions)
//! - Video transcript summaries
//! - Translation with a per-language-pair model cache
//! - Question answering over a text document
//! - LinkedIn-style post generation with SQLite history
//! - News digests from RSS feed snapshots

pub mod chunking;
pub mod config;
pub mod digest;
pub mod error;
pub mod llm;
pub mod posts;
pub mod qa;
pub mod storage;
pub mod summarize;
pub mod transcript;
pub mod translate;

pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::chunking::ChunkBuilder;
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::llm::{LlmClient, LlmSummarizer};
    pub use crate::summarize::{ChunkedSummarizer, SummaryBounds, Summarizer};
}
