//! Error types for condense

use thiserror::Error;

use crate::summarize::SummaryStage;

/// Result type alias using condense's Error
pub type Result<T> = std::result::Result<T, Error>;

/// condense error types with helpful messages and suggestions
#[derive(Error, Debug)]
pub enum Error {
    // Input errors (E001-E099)
    #[error("Nothing to {0}.")]
    EmptyInput(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unsupported file type '{0}'. Use a plain text file (.txt, .md).")]
    UnsupportedFileType(String),

    #[error("Could not extract a video id from '{0}'. Check the URL.")]
    InvalidVideoUrl(String),

    // Network / model errors (E100-E199)
    #[error("Network error: {0}. Check your internet connection.")]
    NetworkError(#[from] reqwest::Error),

    #[error("LLM API error: {0}. Check your API key with `condense config get llm.api_key`.")]
    LLMError(String),

    #[error("Rate limited. Waiting {0} seconds before retry.")]
    RateLimited(u64),

    #[error("No suitable model found: {0}")]
    NoSuitableModel(String),

    #[error("Summarization failed at {stage}: {source}")]
    OracleFailure {
        stage: SummaryStage,
        source: Box<Error>,
    },

    // Translation errors (E200-E299)
    #[error("Translation model for {from} -> {to} is not available.")]
    TranslationUnavailable { from: String, to: String },

    // Transcript errors (E300-E399)
    #[error("Transcript unavailable: {0}")]
    TranscriptUnavailable(String),

    // Database errors (E400-E499)
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Post '{0}' not found. Run `condense post history` to see saved posts.")]
    PostNotFound(String),

    // Config errors (E600-E699)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    // Generic errors
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Get error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyInput(_) => "E001",
            Self::InvalidInput(_) => "E002",
            Self::UnsupportedFileType(_) => "E003",
            Self::InvalidVideoUrl(_) => "E004",
            Self::NetworkError(_) => "E100",
            Self::LLMError(_) => "E101",
            Self::RateLimited(_) => "E102",
            Self::NoSuitableModel(_) => "E103",
            Self::OracleFailure { .. } => "E110",
            Self::TranslationUnavailable { .. } => "E200",
            Self::TranscriptUnavailable(_) => "E300",
            Self::DatabaseError(_) => "E400",
            Self::PostNotFound(_) => "E401",
            Self::ConfigError(_) => "E600",
            Self::Other(_) | Self::Io(_) | Self::Json(_) => "E9999",
        }
    }

    /// Get suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::NetworkError(_) => Some("Check internet connection".to_string()),
            Self::LLMError(_) => Some("condense config get llm.api_key".to_string()),
            Self::TranslationUnavailable { .. } => Some("condense languages".to_string()),
            Self::PostNotFound(_) => Some("condense post history".to_string()),
            Self::UnsupportedFileType(_) => {
                Some("Convert the document to plain text first".to_string())
            }
            Self::OracleFailure { source, .. } => source.suggestion(),
            _ => None,
        }
    }

    /// The innermost error, looking through summarization stage wrappers
    pub fn root(&self) -> &Error {
        match self {
            Self::OracleFailure { source, .. } => source.root(),
            other => other,
        }
    }
}
