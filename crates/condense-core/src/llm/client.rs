//! Chat completion client
//!
//! Async HTTP client for an OpenAI-compatible endpoint with:
//! - Per-call model, temperature and token overrides
//! - Model fallback with automatic retry
//! - Rate limit handling with exponential backoff

use std::time::Duration;

use reqwest::Client as HttpClient;
use tracing::{debug, error, info, warn};

use crate::config::LlmConfig;
use crate::error::{Error, Result};

use super::types::{ChatRequest, ChatResponse, CompletionOptions, LlmResponse, Message};

/// Maximum number of attempts for rate-limited requests
const MAX_RETRY_ATTEMPTS: u32 = 3;

/// Base delay for exponential backoff (in milliseconds)
const BACKOFF_BASE_MS: u64 = 1000;

/// Longest server-requested wait we sleep through before retrying
const MAX_BACKOFF_SECS: u64 = 120;

/// Chat completion client
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct LlmClient {
    http_client: HttpClient,
    config: LlmConfig,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmClient")
            .field("base_url", &self.base_url)
            .field("default_model", &self.config.default_model)
            .finish()
    }
}

/// Builder for creating an LlmClient
#[derive(Default)]
pub struct LlmClientBuilder {
    config: Option<LlmConfig>,
    api_key: Option<String>,
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

impl LlmClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: LlmConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Override the configured base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    pub fn build(self) -> Result<LlmClient> {
        let config = self.config.unwrap_or_default();
        let api_key = self
            .api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::LLMError("API key is required".to_string()))?;

        let timeout_secs = self.timeout_secs.unwrap_or(config.timeout_secs);

        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(Error::NetworkError)?;

        let base_url = self
            .base_url
            .unwrap_or_else(|| config.base_url.clone())
            .trim_end_matches('/')
            .to_string();

        Ok(LlmClient {
            http_client,
            config,
            api_key,
            base_url,
        })
    }
}

impl LlmClient {
    pub fn new(config: LlmConfig, api_key: impl Into<String>) -> Result<Self> {
        LlmClientBuilder::new()
            .config(config)
            .api_key(api_key)
            .build()
    }

    /// Build a client from configuration, reading the key from the environment
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let api_key = config
            .resolved_api_key()
            .map_err(|e| Error::ConfigError(e.to_string()))?
            .ok_or_else(|| {
                Error::ConfigError(
                    "No API key found. Set CONDENSE_API_KEY or GROQ_API_KEY.".to_string(),
                )
            })?;
        Self::new(config.clone(), api_key)
    }

    pub fn builder() -> LlmClientBuilder {
        LlmClientBuilder::new()
    }

    pub fn default_model(&self) -> &str {
        &self.config.default_model
    }

    pub fn fallback_models(&self) -> &[String] {
        &self.config.fallback_models
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Make a single chat completion request
    ///
    /// Unset fields in `options` fall back to the client's configuration.
    pub async fn complete(
        &self,
        messages: Vec<Message>,
        options: &CompletionOptions,
    ) -> Result<LlmResponse> {
        let model = options
            .model
            .as_deref()
            .unwrap_or(&self.config.default_model);

        let request = ChatRequest::new(model, messages)
            .with_temperature(options.temperature.unwrap_or(self.config.temperature))
            .with_max_tokens(options.max_tokens.unwrap_or(self.config.max_tokens));

        self.execute_request(&request).await
    }

    /// Make a chat completion request with automatic fallback
    ///
    /// Tries the requested (or default) model first, then each fallback
    /// model while failures are recoverable.
    pub async fn complete_with_fallback(
        &self,
        messages: Vec<Message>,
        options: &CompletionOptions,
    ) -> Result<LlmResponse> {
        let primary = options
            .model
            .clone()
            .unwrap_or_else(|| self.config.default_model.clone());
        let fallbacks = self
            .config
            .fallback_models
            .iter()
            .filter(|m| **m != primary)
            .cloned();
        let models: Vec<String> = std::iter::once(primary.clone()).chain(fallbacks).collect();

        let mut last_error = None;

        for model in &models {
            debug!(model = %model, "Attempting chat completion");

            let attempt = CompletionOptions {
                model: Some(model.clone()),
                ..options.clone()
            };

            match self.complete(messages.clone(), &attempt).await {
                Ok(response) => {
                    info!(model = %model, tokens = response.tokens_used, "Chat completion successful");
                    return Ok(response);
                }
                Err(Error::RateLimited(secs)) => {
                    warn!(model = %model, wait_secs = secs, "Rate limited, trying next model");
                    last_error = Some(Error::RateLimited(secs));
                }
                Err(Error::LLMError(msg)) if is_model_error(&msg) => {
                    warn!(model = %model, error = %msg, "Model error, trying next model");
                    last_error = Some(Error::LLMError(msg));
                }
                Err(e) => {
                    error!(model = %model, error = %e, "Non-recoverable error");
                    return Err(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| Error::NoSuitableModel("All models failed".to_string())))
    }

    async fn execute_request(&self, request: &ChatRequest) -> Result<LlmResponse> {
        let mut attempts = 0;

        loop {
            attempts += 1;

            match self.send_request(request).await {
                Ok(response) => return Ok(response),
                Err(Error::RateLimited(wait_secs)) if wait_secs > MAX_BACKOFF_SECS => {
                    warn!(
                        wait_secs = wait_secs,
                        max_secs = MAX_BACKOFF_SECS,
                        "Rate limit wait too long, giving up"
                    );
                    return Err(Error::RateLimited(wait_secs));
                }
                Err(Error::RateLimited(wait_secs)) if attempts < MAX_RETRY_ATTEMPTS => {
                    let backoff = calculate_backoff(attempts, wait_secs);
                    warn!(
                        attempt = attempts,
                        wait_ms = backoff,
                        "Rate limited, retrying after backoff"
                    );
                    tokio::time::sleep(Duration::from_millis(backoff)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn send_request(&self, request: &ChatRequest) -> Result<LlmResponse> {
        let url = format!("{}/chat/completions", self.base_url);

        debug!(
            model = %request.model,
            messages = request.messages.len(),
            "Sending chat completion request"
        );

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(Error::NetworkError)?;

        let status = response.status();

        if !status.is_success() {
            return handle_error_response(status, response).await;
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::LLMError(format!("Failed to parse response: {}", e)))?;

        LlmResponse::from_chat_response(chat_response)
            .ok_or_else(|| Error::LLMError("Empty response from API".to_string()))
    }
}

/// Map a non-success HTTP status to an error
async fn handle_error_response<T>(
    status: reqwest::StatusCode,
    response: reqwest::Response,
) -> Result<T> {
    let header_wait = response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok());
    let body = response.text().await.unwrap_or_default();

    match status.as_u16() {
        401 => Err(Error::LLMError(
            "Unauthorized: Invalid API key. Set CONDENSE_API_KEY or GROQ_API_KEY environment variable.".to_string(),
        )),
        429 => {
            let wait_secs = header_wait
                .or_else(|| extract_retry_after(&body))
                .unwrap_or(60);
            Err(Error::RateLimited(wait_secs))
        }
        400 => Err(Error::LLMError(format!("Bad request: {}", body))),
        403 => Err(Error::LLMError(format!("Forbidden: {}", body))),
        404 => Err(Error::LLMError(format!(
            "Model not found or endpoint unavailable: {}",
            body
        ))),
        500..=599 => Err(Error::LLMError(format!("Server error ({}): {}", status, body))),
        _ => Err(Error::LLMError(format!("HTTP error {}: {}", status, body))),
    }
}

/// Check if an error message indicates a model-specific error
fn is_model_error(msg: &str) -> bool {
    let model_error_patterns = [
        "model not found",
        "decommissioned",
        "unavailable",
        "not available",
        "overloaded",
        "capacity",
    ];

    let msg_lower = msg.to_lowercase();
    model_error_patterns
        .iter()
        .any(|pattern| msg_lower.contains(pattern))
}

/// Calculate backoff delay with jitter
fn calculate_backoff(attempt: u32, suggested_wait: u64) -> u64 {
    let base = BACKOFF_BASE_MS.saturating_mul(2u64.saturating_pow(attempt.saturating_sub(1)));
    let suggested = suggested_wait.min(MAX_BACKOFF_SECS).saturating_mul(1000);

    let delay = base.max(suggested);

    // up to 10% jitter
    let jitter = delay / 10;
    delay + (rand_jitter() % jitter.max(1))
}

fn rand_jitter() -> u64 {
    use std::time::SystemTime;
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64 % 1000)
        .unwrap_or(0)
}

/// Extract a retry-after value from an error body
fn extract_retry_after(body: &str) -> Option<u64> {
    let json = serde_json::from_str::<serde_json::Value>(body).ok()?;
    json.get("retry_after")
        .and_then(|v| v.as_u64())
        .or_else(|| {
            json.get("error")
                .and_then(|e| e.get("retry_after"))
                .and_then(|v| v.as_u64())
        })
}
