//! Two-level summarization of long text
//!
//! Text is chunked on sentence boundaries, every non-blank chunk is
//! summarized in order, and the partial summaries are joined. When the joined
//! text is still longer than the combine threshold, one more pass summarizes
//! it into the final result.

use serde::Serialize;
use tracing::{debug, info};

use super::oracle::{SummaryBounds, SummaryStage, Summarizer};
use crate::chunking::{ChunkBuilder, DEFAULT_MAX_CHARS};
use crate::config::SummarizeConfig;
use crate::error::{Error, Result};

/// Default length above which the joined partial summaries get a final pass
pub const DEFAULT_COMBINE_THRESHOLD: usize = 1500;

/// Default per-chunk bounds
pub const DEFAULT_CHUNK_BOUNDS: SummaryBounds = SummaryBounds::new(180, 60);

/// Default bounds for the combine pass
pub const DEFAULT_FINAL_BOUNDS: SummaryBounds = SummaryBounds::new(200, 80);

/// Tuning for [`ChunkedSummarizer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkedOptions {
    /// Maximum characters per chunk
    pub chunk_max_chars: usize,
    /// Joined partial summaries longer than this get a combine pass
    pub combine_threshold: usize,
    /// Bounds for each chunk summary
    pub chunk_bounds: SummaryBounds,
    /// Bounds for the combine pass
    pub final_bounds: SummaryBounds,
}

impl Default for ChunkedOptions {
    fn default() -> Self {
        Self {
            chunk_max_chars: DEFAULT_MAX_CHARS,
            combine_threshold: DEFAULT_COMBINE_THRESHOLD,
            chunk_bounds: DEFAULT_CHUNK_BOUNDS,
            final_bounds: DEFAULT_FINAL_BOUNDS,
        }
    }
}

impl From<&SummarizeConfig> for ChunkedOptions {
    fn from(config: &SummarizeConfig) -> Self {
        Self {
            chunk_max_chars: config.chunk_max_chars,
            combine_threshold: config.combine_threshold,
            chunk_bounds: SummaryBounds::new(config.chunk_max_length, config.chunk_min_length),
            final_bounds: SummaryBounds::new(config.final_max_length, config.final_min_length),
        }
    }
}

/// Outcome of a chunked summarization, with counters for reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryReport {
    /// The final summary (empty for blank input)
    pub summary: String,
    /// Number of chunks the input was split into, blank ones included
    pub chunk_count: usize,
    /// Number of summarizer calls made
    pub oracle_calls: usize,
    /// Whether the combine pass ran
    pub combined_pass: bool,
}

impl SummaryReport {
    /// True when no summary was produced
    pub fn is_empty(&self) -> bool {
        self.summary.is_empty()
    }
}

/// Summarizes arbitrarily long text through a [`Summarizer`]
#[derive(Debug, Clone)]
pub struct ChunkedSummarizer<S> {
    oracle: S,
    builder: ChunkBuilder,
    options: ChunkedOptions,
}

impl<S: Summarizer> ChunkedSummarizer<S> {
    /// Create a summarizer; fails when `chunk_max_chars` is zero
    pub fn new(oracle: S, options: ChunkedOptions) -> Result<Self> {
        let builder = ChunkBuilder::new(options.chunk_max_chars)?;
        Ok(Self {
            oracle,
            builder,
            options,
        })
    }

    /// Create a summarizer with the default thresholds
    pub fn with_defaults(oracle: S) -> Self {
        Self {
            oracle,
            builder: ChunkBuilder::default(),
            options: ChunkedOptions::default(),
        }
    }

    /// Chunking and length settings in use
    pub fn options(&self) -> &ChunkedOptions {
        &self.options
    }

    /// The underlying summarizer
    pub fn oracle(&self) -> &S {
        &self.oracle
    }

    /// Summarize `text`, returning only the final summary
    pub async fn summarize(&self, text: &str) -> Result<String> {
        Ok(self.summarize_detailed(text).await?.summary)
    }

    /// Summarize `text`, returning the summary with pipeline counters.
    ///
    /// Blank input returns an empty report without calling the summarizer.
    /// The first failing call aborts the whole operation.
    pub async fn summarize_detailed(&self, text: &str) -> Result<SummaryReport> {
        let chunks = self.builder.chunk_text(text);
        let chunk_count = chunks.len();
        let mut partials = Vec::with_capacity(chunk_count);

        debug!(
            chunks = chunk_count,
            max_chars = self.builder.max_chars(),
            "Chunked input text"
        );

        for chunk in &chunks {
            if chunk.is_blank() {
                debug!(chunk = chunk.index, "Skipping blank chunk");
                continue;
            }

            debug!(
                chunk = chunk.index,
                chars = chunk.char_count,
                window = chunk.window,
                "Summarizing chunk"
            );

            let partial = self
                .oracle
                .summarize(&chunk.text, self.options.chunk_bounds)
                .await
                .map_err(|source| Error::OracleFailure {
                    stage: SummaryStage::Chunk(chunk.index),
                    source: Box::new(source),
                })?;
            partials.push(partial);
        }

        let mut oracle_calls = partials.len();

        if partials.is_empty() {
            return Ok(SummaryReport {
                summary: String::new(),
                chunk_count,
                oracle_calls,
                combined_pass: false,
            });
        }

        let combined = partials.join(" ");
        let combined_len = combined.chars().count();

        if combined_len <= self.options.combine_threshold {
            return Ok(SummaryReport {
                summary: combined,
                chunk_count,
                oracle_calls,
                combined_pass: false,
            });
        }

        info!(
            partials = partials.len(),
            combined_chars = combined_len,
            threshold = self.options.combine_threshold,
            "Partial summaries exceed threshold, running combine pass"
        );

        let summary = self
            .oracle
            .summarize(&combined, self.options.final_bounds)
            .await
            .map_err(|source| Error::OracleFailure {
                stage: SummaryStage::Combine,
                source: Box::new(source),
            })?;
        oracle_calls += 1;

        Ok(SummaryReport {
            summary,
            chunk_count,
            oracle_calls,
            combined_pass: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summarize::testing::RecordingSummarizer;

    #[tokio::test]
    async fn test_blank_input_makes_no_calls() {
        let oracle = RecordingSummarizer::echo();
        let summarizer = ChunkedSummarizer::with_defaults(oracle.clone());

        for text in ["", "   ", "\n\t  \n"] {
            let report = summarizer.summarize_detailed(text).await.unwrap();
            assert!(report.is_empty());
            assert_eq!(report.oracle_calls, 0);
        }
        assert_eq!(oracle.call_count(), 0);
    }

    #[tokio::test]
    async fn test_accessors_expose_settings_and_summarizer() {
        let options = ChunkedOptions {
            chunk_max_chars: 300,
            ..ChunkedOptions::default()
        };
        let summarizer = ChunkedSummarizer::new(RecordingSummarizer::echo(), options).unwrap();
        assert_eq!(summarizer.options(), &options);

        let report = summarizer.summarize_detailed("Hello world.").await.unwrap();
        assert!(!report.is_empty());
        assert_eq!(summarizer.oracle().call_count(), 1);
    }

    #[tokio::test]
    async fn test_single_sentence_returned_unchanged() {
        let oracle = RecordingSummarizer::new(|_, _| Ok("A greeting.".to_string()));
        let summarizer = ChunkedSummarizer::with_defaults(oracle.clone());

        let report = summarizer.summarize_detailed("Hello world.").await.unwrap();

        assert_eq!(report.summary, "A greeting.");
        assert_eq!(report.chunk_count, 1);
        assert_eq!(report.oracle_calls, 1);
        assert!(!report.combined_pass);

        let calls = oracle.calls();
        assert_eq!(calls[0].0, "Hello world.");
        assert_eq!(calls[0].1, DEFAULT_CHUNK_BOUNDS);
    }

    #[tokio::test]
    async fn test_partials_joined_in_chunk_order() {
        let oracle = RecordingSummarizer::new(|index, _| Ok(format!("s{index}")));
        let options = ChunkedOptions {
            chunk_max_chars: 12,
            ..ChunkedOptions::default()
        };
        let summarizer = ChunkedSummarizer::new(oracle.clone(), options).unwrap();

        let summary = summarizer
            .summarize("First one. Second one. Third one.")
            .await
            .unwrap();

        assert_eq!(summary, "s0 s1 s2");
        let texts: Vec<String> = oracle.calls().into_iter().map(|(text, _)| text).collect();
        assert_eq!(texts, vec!["First one.", "Second one.", "Third one."]);
    }

    #[tokio::test]
    async fn test_combine_pass_runs_once_over_long_partials() {
        let oracle = RecordingSummarizer::new(|index, _| {
            if index < 2 {
                Ok("p".repeat(800))
            } else {
                Ok("FINAL".to_string())
            }
        });
        let options = ChunkedOptions {
            chunk_max_chars: 20,
            ..ChunkedOptions::default()
        };
        let summarizer = ChunkedSummarizer::new(oracle.clone(), options).unwrap();

        let report = summarizer
            .summarize_detailed("Sentence number one. Sentence number two.")
            .await
            .unwrap();

        assert_eq!(report.summary, "FINAL");
        assert_eq!(report.oracle_calls, 3);
        assert!(report.combined_pass);

        let calls = oracle.calls();
        assert_eq!(calls.len(), 3);
        let expected_combined = format!("{} {}", "p".repeat(800), "p".repeat(800));
        assert_eq!(calls[2].0, expected_combined);
        assert_eq!(calls[2].1, DEFAULT_FINAL_BOUNDS);
    }

    #[tokio::test]
    async fn test_threshold_is_inclusive() {
        // Two partials of 749 chars joined by a space: exactly 1499
        // Two partials of 750 chars joined by a space: 1501
        for (len, expect_combine) in [(749, false), (750, true)] {
            let oracle = RecordingSummarizer::new(move |index, _| {
                if index < 2 {
                    Ok("q".repeat(len))
                } else {
                    Ok("done".to_string())
                }
            });
            let options = ChunkedOptions {
                chunk_max_chars: 10,
                ..ChunkedOptions::default()
            };
            let summarizer = ChunkedSummarizer::new(oracle.clone(), options).unwrap();
            let report = summarizer.summarize_detailed("Alpha. Beta.").await.unwrap();
            assert_eq!(report.combined_pass, expect_combine, "partial length {len}");
        }
    }

    #[tokio::test]
    async fn test_failure_aborts_without_partial_result() {
        let oracle = RecordingSummarizer::new(|index, _| {
            if index == 1 {
                Err(Error::LLMError("model overloaded".to_string()))
            } else {
                Ok("ok".to_string())
            }
        });
        let options = ChunkedOptions {
            chunk_max_chars: 8,
            ..ChunkedOptions::default()
        };
        let summarizer = ChunkedSummarizer::new(oracle.clone(), options).unwrap();

        let result = summarizer.summarize("One one. Two two. Three.").await;

        match result {
            Err(Error::OracleFailure { stage, source }) => {
                assert_eq!(stage, SummaryStage::Chunk(1));
                assert!(matches!(*source, Error::LLMError(_)));
            }
            other => panic!("expected oracle failure, got {other:?}"),
        }
        assert_eq!(oracle.call_count(), 2);
    }

    #[tokio::test]
    async fn test_combine_failure_is_reported_as_combine_stage() {
        let oracle = RecordingSummarizer::new(|index, _| {
            if index < 2 {
                Ok("r".repeat(900))
            } else {
                Err(Error::RateLimited(5))
            }
        });
        let options = ChunkedOptions {
            chunk_max_chars: 6,
            ..ChunkedOptions::default()
        };
        let summarizer = ChunkedSummarizer::new(oracle.clone(), options).unwrap();

        let err = summarizer.summarize("Alpha. Beta.").await.unwrap_err();
        assert!(matches!(
            err,
            Error::OracleFailure {
                stage: SummaryStage::Combine,
                ..
            }
        ));
        assert!(matches!(err.root(), Error::RateLimited(5)));
    }

    #[tokio::test]
    async fn test_blank_windows_are_skipped() {
        let oracle = RecordingSummarizer::echo();
        let options = ChunkedOptions {
            chunk_max_chars: 4,
            ..ChunkedOptions::default()
        };
        let summarizer = ChunkedSummarizer::new(oracle.clone(), options).unwrap();

        // One oversized sentence whose middle window is pure whitespace
        let report = summarizer.summarize_detailed("abcd    efgh").await.unwrap();

        assert_eq!(report.chunk_count, 3);
        assert_eq!(report.oracle_calls, 2);
        assert_eq!(report.summary, "abcd efgh");
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let options = ChunkedOptions {
            chunk_max_chars: 0,
            ..ChunkedOptions::default()
        };
        let result = ChunkedSummarizer::new(RecordingSummarizer::echo(), options);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_options_from_config() {
        let config = SummarizeConfig::default();
        let options = ChunkedOptions::from(&config);
        assert_eq!(options, ChunkedOptions::default());
    }
}
