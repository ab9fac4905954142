use serde::Serialize;
use tracing::info;

use super::prompt::render_post_prompt;
use crate::error::{Error, Result};
use crate::llm::{CompletionOptions, LlmClient, Message};

/// Sampling temperature for post generation
pub const POST_TEMPERATURE: f32 = 0.7;

/// Token cap for a generated post
pub const POST_MAX_TOKENS: usize = 500;

/// A freshly generated post, not yet saved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedPost {
    pub topic: String,
    pub body: String,
    pub model: String,
}

/// Writes posts on a topic with a chat model
#[derive(Debug, Clone)]
pub struct PostGenerator {
    client: LlmClient,
}

impl PostGenerator {
    pub fn new(client: LlmClient) -> Self {
        Self { client }
    }

    pub async fn generate(&self, topic: &str) -> Result<GeneratedPost> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(Error::EmptyInput("write about: the topic is empty".to_string()));
        }

        let options = CompletionOptions::new()
            .temperature(POST_TEMPERATURE)
            .max_tokens(POST_MAX_TOKENS);
        let messages = vec![Message::user(render_post_prompt(topic))];

        let response = self.client.complete_with_fallback(messages, &options).await?;
        let body = response.content.trim();
        if body.is_empty() {
            return Err(Error::LLMError("Model returned an empty post".to_string()));
        }

        info!(model = %response.model, words = body.split_whitespace().count(), "Post generated");
        Ok(GeneratedPost {
            topic: topic.to_string(),
            body: body.to_string(),
            model: response.model,
        })
    }
}
