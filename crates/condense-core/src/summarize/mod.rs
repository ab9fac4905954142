//! Summarization
//!
//! - `oracle`: the [`Summarizer`] seam and its bounds
//! - `chunked`: chunk-then-combine summarization of long text
//! - `single`: one-shot summarization of short text

mod chunked;
mod oracle;
mod single;

pub use chunked::{
    ChunkedOptions, ChunkedSummarizer, DEFAULT_CHUNK_BOUNDS, DEFAULT_COMBINE_THRESHOLD,
    DEFAULT_FINAL_BOUNDS, SummaryReport,
};
pub use oracle::{SummaryBounds, SummaryStage, Summarizer};
pub use single::{DEFAULT_SINGLE_BOUNDS, summarize_once};
