//! Video transcript summarization
//!
//! Resolves a video URL to its id, fetches the transcript through a
//! [`TranscriptSource`] and condenses it with the chunked summarizer.

mod source;
mod video_id;

pub use source::{DirectoryTranscriptSource, TranscriptSegment, TranscriptSource};
pub use video_id::extract_video_id;

use serde::Serialize;
use tracing::info;

use crate::error::{Error, Result};
use crate::summarize::{ChunkedSummarizer, SummaryReport, Summarizer};

/// Summary of one video transcript
#[derive(Debug, Clone, Serialize)]
pub struct VideoSummary {
    pub video_id: String,
    /// Transcript length in characters
    pub transcript_chars: usize,
    #[serde(flatten)]
    pub report: SummaryReport,
}

/// Summarizes videos from their transcripts
pub struct VideoSummarizer<S, T> {
    summarizer: ChunkedSummarizer<S>,
    transcripts: T,
}

impl<S: Summarizer, T: TranscriptSource> VideoSummarizer<S, T> {
    pub fn new(summarizer: ChunkedSummarizer<S>, transcripts: T) -> Self {
        Self {
            summarizer,
            transcripts,
        }
    }

    /// Fetch and summarize the transcript behind `url`
    pub async fn summarize_url(&self, url: &str) -> Result<VideoSummary> {
        let video_id =
            extract_video_id(url).ok_or_else(|| Error::InvalidVideoUrl(url.trim().to_string()))?;

        let transcript = self.transcripts.fetch(&video_id).await?;
        let transcript = transcript.trim();
        if transcript.is_empty() {
            return Err(Error::EmptyInput("summarize: the transcript is empty".to_string()));
        }

        let transcript_chars = transcript.chars().count();
        info!(video_id = %video_id, chars = transcript_chars, "Summarizing transcript");

        let report = self.summarizer.summarize_detailed(transcript).await?;
        if report.is_empty() {
            return Err(Error::EmptyInput(
                "summarize: the transcript produced no summary".to_string(),
            ));
        }

        Ok(VideoSummary {
            video_id,
            transcript_chars,
            report,
        })
    }
}
