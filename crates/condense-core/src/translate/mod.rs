//! Text translation between supported languages
//!
//! Translators are loaded per language pair through a [`TranslatorLoader`]
//! and kept in an explicitly owned [`TranslatorCache`].

mod cache;
mod language;
mod llm;
mod service;

pub use cache::{Translator, TranslatorCache, TranslatorLoader};
pub use language::{LANGUAGES, Language, LanguagePair, find_language};
pub use llm::{LlmTranslator, LlmTranslatorLoader};
pub use service::{DEFAULT_TRANSLATION_MAX_LENGTH, Translation, TranslationService};
