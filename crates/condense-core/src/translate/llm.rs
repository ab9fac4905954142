//! LLM-backed translators

use std::sync::Arc;

use async_trait::async_trait;

use super::cache::{Translator, TranslatorLoader};
use super::language::LanguagePair;
use crate::error::{Error, Result};
use crate::llm::{CompletionOptions, LlmClient, Message};

/// Translates one direction by prompting a chat model
#[derive(Debug, Clone)]
pub struct LlmTranslator {
    client: LlmClient,
    pair: LanguagePair,
}

impl LlmTranslator {
    pub fn new(client: LlmClient, pair: LanguagePair) -> Self {
        Self { client, pair }
    }

    fn instructions(&self) -> String {
        format!(
            "You are a professional translator. Translate the user's text from {} to {}. \
             Preserve meaning, tone and formatting. Reply with the translation only.",
            self.pair.source.name, self.pair.target.name
        )
    }
}

#[async_trait]
impl Translator for LlmTranslator {
    async fn translate(&self, text: &str, max_length: usize) -> Result<String> {
        let messages = vec![Message::system(self.instructions()), Message::user(text)];
        let options = CompletionOptions::new()
            .temperature(0.0)
            .max_tokens(max_length);

        let response = self.client.complete_with_fallback(messages, &options).await?;
        let output = response.content.trim();
        if output.is_empty() {
            return Err(Error::LLMError("Model returned an empty translation".to_string()));
        }
        Ok(output.to_string())
    }
}

/// Provides an [`LlmTranslator`] for any pair of supported languages
#[derive(Debug, Clone)]
pub struct LlmTranslatorLoader {
    client: LlmClient,
}

impl LlmTranslatorLoader {
    pub fn new(client: LlmClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TranslatorLoader for LlmTranslatorLoader {
    async fn load(&self, pair: LanguagePair) -> Result<Option<Arc<dyn Translator>>> {
        Ok(Some(Arc::new(LlmTranslator::new(self.client.clone(), pair))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LlmConfig;
    use crate::translate::TranslationService;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_translation_through_llm() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(json!({"max_tokens": 200})))
            .and(body_string_contains("from English to French"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": "llama-3.1-8b-instant",
                "choices": [{
                    "message": {"role": "assistant", "content": "Bonjour le monde\n"},
                    "finish_reason": "stop"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = LlmClient::builder()
            .config(LlmConfig::default())
            .api_key("test-key")
            .base_url(server.uri())
            .build()
            .unwrap();
        let service = TranslationService::new(Arc::new(LlmTranslatorLoader::new(client)));

        let result = service
            .translate("Hello world", "English", "French")
            .await
            .unwrap();
        assert_eq!(result.text, "Bonjour le monde");
    }
}
