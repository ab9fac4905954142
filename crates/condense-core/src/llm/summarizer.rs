//! [`Summarizer`] backed by a chat completion model

use async_trait::async_trait;
use tracing::debug;

use super::client::LlmClient;
use super::types::{CompletionOptions, Message};
use crate::error::{Error, Result};
use crate::summarize::{SummaryBounds, Summarizer};

const SYSTEM_PROMPT: &str = "You are a precise summarization engine. \
Reply with the summary only: no preamble, no headings, no commentary. \
Keep names, figures and conclusions from the source. Never add facts.";

/// Summarizes by prompting an LLM
///
/// Requests are deterministic (temperature 0) and capped at
/// `bounds.max_length` completion tokens.
#[derive(Debug, Clone)]
pub struct LlmSummarizer {
    client: LlmClient,
    model: Option<String>,
}

impl LlmSummarizer {
    pub fn new(client: LlmClient) -> Self {
        Self {
            client,
            model: None,
        }
    }

    /// Use `model` instead of the client's default
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    fn prompt(text: &str, bounds: SummaryBounds) -> String {
        format!(
            "Summarize the following text in roughly {} to {} tokens.\n\n{}",
            bounds.min_length, bounds.max_length, text
        )
    }
}

#[async_trait]
impl Summarizer for LlmSummarizer {
    async fn summarize(&self, text: &str, bounds: SummaryBounds) -> Result<String> {
        let messages = vec![
            Message::system(SYSTEM_PROMPT),
            Message::user(Self::prompt(text, bounds)),
        ];

        let mut options = CompletionOptions::new()
            .temperature(0.0)
            .max_tokens(bounds.max_length);
        if let Some(model) = &self.model {
            options = options.model(model.clone());
        }

        debug!(chars = text.chars().count(), max = bounds.max_length, "Requesting summary");
        let response = self.client.complete_with_fallback(messages, &options).await?;

        let summary = response.content.trim();
        if summary.is_empty() {
            return Err(Error::LLMError("Model returned an empty summary".to_string()));
        }
        Ok(summary.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LlmConfig;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn reply(content: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "model": "llama-3.1-8b-instant",
            "choices": [{
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }]
        }))
    }

    fn client_for(server: &MockServer) -> LlmClient {
        LlmClient::builder()
            .config(LlmConfig::default())
            .api_key("test-key")
            .base_url(server.uri())
            .build()
            .unwrap()
    }

    #[test]
    fn test_prompt_mentions_bounds() {
        let prompt = LlmSummarizer::prompt("Body.", SummaryBounds::new(180, 60));
        assert!(prompt.contains("60 to 180"));
        assert!(prompt.ends_with("Body."));
    }

    #[tokio::test]
    async fn test_summarize_is_deterministic_and_bounded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(json!({"temperature": 0.0, "max_tokens": 180})))
            .and(body_string_contains("The quick brown fox."))
            .respond_with(reply("  A fox jumped.\n"))
            .expect(1)
            .mount(&server)
            .await;

        let summarizer = LlmSummarizer::new(client_for(&server));
        let summary = summarizer
            .summarize("The quick brown fox.", SummaryBounds::new(180, 60))
            .await
            .unwrap();

        assert_eq!(summary, "A fox jumped.");
    }

    #[tokio::test]
    async fn test_model_override() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(json!({"model": "mixtral-8x7b"})))
            .respond_with(reply("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let summarizer = LlmSummarizer::new(client_for(&server)).with_model("mixtral-8x7b");
        let summary = summarizer
            .summarize("Text.", SummaryBounds::new(90, 30))
            .await
            .unwrap();
        assert_eq!(summary, "ok");
    }

    #[tokio::test]
    async fn test_blank_reply_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(reply("   "))
            .mount(&server)
            .await;

        let err = LlmSummarizer::new(client_for(&server))
            .summarize("Text.", SummaryBounds::new(90, 30))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::LLMError(_)));
    }
}
