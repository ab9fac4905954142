//! LLM integration over an OpenAI-compatible chat completions API
//!
//! This module provides:
//! - HTTP client with retry and model fallback
//! - Request/response wire types
//! - An LLM-backed [`crate::summarize::Summarizer`]

mod client;
mod summarizer;
mod types;

pub use client::{LlmClient, LlmClientBuilder};
pub use summarizer::LlmSummarizer;
pub use types::{
    ChatRequest, ChatResponse, Choice, CompletionOptions, FinishReason, LlmResponse, Message,
    MessageRole, Usage,
};
