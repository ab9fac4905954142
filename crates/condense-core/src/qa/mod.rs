//! Question answering over a user-supplied document

use std::path::Path;

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::llm::{CompletionOptions, LlmClient, Message};

/// File extensions read as UTF-8 text
pub const TEXT_EXTENSIONS: [&str; 3] = ["txt", "md", "text"];

/// Reply used when the context does not contain the answer
pub const NO_ANSWER: &str = "I don't know based on the provided context.";

const ANSWER_MAX_TOKENS: usize = 256;

/// Read a context document from disk.
///
/// Only plain-text formats are supported; PDF, spreadsheets and anything
/// else are rejected with [`Error::UnsupportedFileType`].
pub fn load_context(path: &Path) -> Result<String> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    if !TEXT_EXTENSIONS.contains(&extension.as_str()) {
        let shown = if extension.is_empty() {
            path.display().to_string()
        } else {
            format!(".{}", extension)
        };
        return Err(Error::UnsupportedFileType(shown));
    }

    Ok(std::fs::read_to_string(path)?)
}

/// Answers a question from a context passage
#[async_trait]
pub trait QuestionAnswerer: Send + Sync {
    async fn answer(&self, question: &str, context: &str) -> Result<String>;
}

/// An answer with where its context came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Answer {
    pub question: String,
    pub answer: String,
    /// `"file"` or `"text"`
    pub context_source: &'static str,
    pub context_chars: usize,
}

/// Answer `question` from a file or inline text.
///
/// A file takes precedence over `text`. With neither, or with only blank
/// content, fails with [`Error::EmptyInput`]; a blank question is
/// [`Error::InvalidInput`].
pub async fn answer_question<A>(
    answerer: &A,
    text: Option<&str>,
    file: Option<&Path>,
    question: &str,
) -> Result<Answer>
where
    A: QuestionAnswerer + ?Sized,
{
    let question = question.trim();
    if question.is_empty() {
        return Err(Error::InvalidInput("the question is empty".to_string()));
    }

    let (context, context_source) = match (file, text) {
        (Some(path), _) => (load_context(path)?, "file"),
        (None, Some(text)) if !text.trim().is_empty() => (text.to_string(), "text"),
        _ => {
            return Err(Error::EmptyInput(
                "answer from: provide context text or a file".to_string(),
            ));
        }
    };

    if context.trim().is_empty() {
        return Err(Error::EmptyInput("answer from: the context is empty".to_string()));
    }

    let context_chars = context.chars().count();
    debug!(source = context_source, chars = context_chars, "Answering question");

    let answer = answerer.answer(question, &context).await?;
    Ok(Answer {
        question: question.to_string(),
        answer: answer.trim().to_string(),
        context_source,
        context_chars,
    })
}

/// Answers strictly from the supplied context by prompting a chat model
#[derive(Debug, Clone)]
pub struct LlmAnswerer {
    client: LlmClient,
}

impl LlmAnswerer {
    pub fn new(client: LlmClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl QuestionAnswerer for LlmAnswerer {
    async fn answer(&self, question: &str, context: &str) -> Result<String> {
        let system = format!(
            "Answer the question using only the context below. Quote the shortest span that \
             answers it. If the context does not contain the answer, reply exactly: {}\n\n\
             Context:\n{}",
            NO_ANSWER, context
        );
        let messages = vec![Message::system(system), Message::user(question)];
        let options = CompletionOptions::new()
            .temperature(0.0)
            .max_tokens(ANSWER_MAX_TOKENS);

        let response = self.client.complete_with_fallback(messages, &options).await?;
        Ok(response.content.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FirstWord {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl QuestionAnswerer for FirstWord {
        async fn answer(&self, _question: &str, context: &str) -> Result<String> {
            self.seen.lock().unwrap().push(context.to_string());
            Ok(context.split_whitespace().next().unwrap_or_default().to_string())
        }
    }

    #[test]
    fn test_load_context_text_formats() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["notes.txt", "README.md", "raw.TEXT"] {
            let path = dir.path().join(name);
            std::fs::write(&path, "content").unwrap();
            assert_eq!(load_context(&path).unwrap(), "content", "{}", name);
        }
    }

    #[test]
    fn test_load_context_rejects_binary_formats() {
        for name in ["report.pdf", "sheet.xlsx", "old.xls", "noext"] {
            let err = load_context(Path::new(name)).unwrap_err();
            assert!(matches!(err, Error::UnsupportedFileType(_)), "{}", name);
        }
    }

    #[tokio::test]
    async fn test_file_takes_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.txt");
        std::fs::write(&path, "Paris is the capital.").unwrap();

        let answerer = FirstWord::default();
        let answer = answer_question(&answerer, Some("Berlin text"), Some(&path), "Capital?")
            .await
            .unwrap();

        assert_eq!(answer.answer, "Paris");
        assert_eq!(answer.context_source, "file");
        assert_eq!(answerer.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_inline_text() {
        let answer = answer_question(&FirstWord::default(), Some("Rust is fast."), None, "What?")
            .await
            .unwrap();

        assert_eq!(answer.answer, "Rust");
        assert_eq!(answer.context_source, "text");
        assert_eq!(answer.context_chars, 13);
    }

    #[tokio::test]
    async fn test_missing_context() {
        let answerer = FirstWord::default();
        for text in [None, Some("   ")] {
            let err = answer_question(&answerer, text, None, "Why?").await.unwrap_err();
            assert!(matches!(err, Error::EmptyInput(_)));
        }
        assert!(answerer.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_question() {
        let err = answer_question(&FirstWord::default(), Some("ctx"), None, " ")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_unsupported_file_wins_over_text() {
        let err = answer_question(
            &FirstWord::default(),
            Some("usable text"),
            Some(Path::new("slides.pdf")),
            "What?",
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::UnsupportedFileType(_)));
    }
}
