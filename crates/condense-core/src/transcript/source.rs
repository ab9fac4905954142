use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

/// Supplies the plain-text transcript of a video
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Fetch the transcript for `video_id`.
    ///
    /// Fails with [`Error::TranscriptUnavailable`] when none exists.
    async fn fetch(&self, video_id: &str) -> Result<String>;
}

/// One caption segment as exported by common transcript tools
#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptSegment {
    pub text: String,
    #[serde(default)]
    pub start: f64,
    #[serde(default)]
    pub duration: f64,
}

/// Reads transcripts cached on disk
///
/// For a video id `abc`, looks for `abc.txt` (plain text) and then
/// `abc.json` (an array of `{text, start, duration}` segments, joined one
/// segment per line).
#[derive(Debug, Clone)]
pub struct DirectoryTranscriptSource {
    root: PathBuf,
}

impl DirectoryTranscriptSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn read_segments(path: &Path) -> Result<String> {
        let raw = tokio::fs::read_to_string(path).await?;
        let segments: Vec<TranscriptSegment> = serde_json::from_str(&raw)?;
        let lines: Vec<&str> = segments
            .iter()
            .map(|s| s.text.trim())
            .filter(|t| !t.is_empty())
            .collect();
        Ok(lines.join("\n"))
    }
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}

#[async_trait]
impl TranscriptSource for DirectoryTranscriptSource {
    async fn fetch(&self, video_id: &str) -> Result<String> {
        // ids are [A-Za-z0-9_-]; anything else could escape the directory
        if video_id.is_empty()
            || !video_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(Error::TranscriptUnavailable(format!(
                "invalid video id '{}'",
                video_id
            )));
        }

        let text_path = self.root.join(format!("{}.txt", video_id));
        if is_file(&text_path).await {
            debug!(path = %text_path.display(), "Reading plain-text transcript");
            return Ok(tokio::fs::read_to_string(&text_path).await?);
        }

        let json_path = self.root.join(format!("{}.json", video_id));
        if is_file(&json_path).await {
            debug!(path = %json_path.display(), "Reading segmented transcript");
            return Self::read_segments(&json_path).await.map_err(|e| {
                Error::TranscriptUnavailable(format!(
                    "could not read {}: {}",
                    json_path.display(),
                    e
                ))
            });
        }

        Err(Error::TranscriptUnavailable(format!(
            "no transcript for video {} in {}",
            video_id,
            self.root.display()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_plain_text() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("dQw4w9WgXcQ.txt"), "Hello there. General.").unwrap();

        let source = DirectoryTranscriptSource::new(dir.path());
        let text = source.fetch("dQw4w9WgXcQ").await.unwrap();
        assert_eq!(text, "Hello there. General.");
    }

    #[tokio::test]
    async fn test_reads_json_segments() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("abcdefghijk.json"),
            r#"[
                {"text": "first line", "start": 0.0, "duration": 1.5},
                {"text": "  ", "start": 1.5, "duration": 0.5},
                {"text": "second line", "start": 2.0, "duration": 1.0}
            ]"#,
        )
        .unwrap();

        let source = DirectoryTranscriptSource::new(dir.path());
        let text = source.fetch("abcdefghijk").await.unwrap();
        assert_eq!(text, "first line\nsecond line");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_concurrent_fetches_on_single_thread() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("aaaaaaaaaaa.txt"), "plain").unwrap();
        std::fs::write(
            dir.path().join("bbbbbbbbbbb.json"),
            r#"[{"text": "segmented"}]"#,
        )
        .unwrap();

        let source = DirectoryTranscriptSource::new(dir.path());
        let (text, segments) = tokio::join!(source.fetch("aaaaaaaaaaa"), source.fetch("bbbbbbbbbbb"));
        assert_eq!(text.unwrap(), "plain");
        assert_eq!(segments.unwrap(), "segmented");
    }

    #[tokio::test]
    async fn test_directory_named_like_transcript_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("abcdefghijk.txt")).unwrap();
        std::fs::write(dir.path().join("abcdefghijk.json"), r#"[{"text": "json wins"}]"#).unwrap();

        let source = DirectoryTranscriptSource::new(dir.path());
        assert_eq!(source.fetch("abcdefghijk").await.unwrap(), "json wins");
    }

    #[tokio::test]
    async fn test_plain_text_preferred_over_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("abcdefghijk.txt"), "from txt").unwrap();
        std::fs::write(dir.path().join("abcdefghijk.json"), "[]").unwrap();

        let source = DirectoryTranscriptSource::new(dir.path());
        assert_eq!(source.fetch("abcdefghijk").await.unwrap(), "from txt");
    }

    #[tokio::test]
    async fn test_missing_transcript() {
        let dir = tempfile::tempdir().unwrap();
        let source = DirectoryTranscriptSource::new(dir.path());

        let err = source.fetch("abcdefghijk").await.unwrap_err();
        assert!(matches!(err, Error::TranscriptUnavailable(_)));
    }

    #[tokio::test]
    async fn test_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("abcdefghijk.json"), "{not json").unwrap();

        let source = DirectoryTranscriptSource::new(dir.path());
        let err = source.fetch("abcdefghijk").await.unwrap_err();
        assert!(matches!(err, Error::TranscriptUnavailable(_)));
    }

    #[tokio::test]
    async fn test_rejects_path_like_ids() {
        let dir = tempfile::tempdir().unwrap();
        let source = DirectoryTranscriptSource::new(dir.path());

        let err = source.fetch("../secret").await.unwrap_err();
        assert!(matches!(err, Error::TranscriptUnavailable(_)));
    }
}
