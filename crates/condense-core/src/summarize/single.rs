//! One-shot summarization for text that fits in a single request

use super::oracle::{SummaryBounds, SummaryStage, Summarizer};
use crate::error::{Error, Result};

/// Default bounds for a single-pass summary
pub const DEFAULT_SINGLE_BOUNDS: SummaryBounds = SummaryBounds::new(130, 30);

/// Summarize `text` with exactly one summarizer call.
///
/// Blank text is rejected with [`Error::EmptyInput`] before any call is made.
pub async fn summarize_once<S>(oracle: &S, text: &str, bounds: SummaryBounds) -> Result<String>
where
    S: Summarizer + ?Sized,
{
    if text.trim().is_empty() {
        return Err(Error::EmptyInput("summarize".to_string()));
    }

    let summary = oracle
        .summarize(text, bounds)
        .await
        .map_err(|source| Error::OracleFailure {
            stage: SummaryStage::Single,
            source: Box::new(source),
        })?;

    Ok(summary.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summarize::testing::RecordingSummarizer;

    #[tokio::test]
    async fn test_blank_text_rejected() {
        let oracle = RecordingSummarizer::echo();
        let result = summarize_once(&oracle, "  \n ", DEFAULT_SINGLE_BOUNDS).await;

        assert!(matches!(result, Err(Error::EmptyInput(_))));
        assert_eq!(oracle.call_count(), 0);
    }

    #[tokio::test]
    async fn test_single_call_with_bounds() {
        let oracle = RecordingSummarizer::new(|_, _| Ok("  short version \n".to_string()));
        let summary = summarize_once(&oracle, "A long article.", DEFAULT_SINGLE_BOUNDS)
            .await
            .unwrap();

        assert_eq!(summary, "short version");
        let calls = oracle.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, SummaryBounds::new(130, 30));
    }

    #[tokio::test]
    async fn test_failure_tagged_as_single_stage() {
        let oracle = RecordingSummarizer::new(|_, _| Err(Error::LLMError("down".to_string())));
        let err = summarize_once(&oracle, "Text.", DEFAULT_SINGLE_BOUNDS)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::OracleFailure {
                stage: SummaryStage::Single,
                ..
            }
        ));
    }
}
