use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use super::cache::{TranslatorCache, TranslatorLoader};
use super::language::LanguagePair;
use crate::error::{Error, Result};

/// Default cap on translated output, in model tokens
pub const DEFAULT_TRANSLATION_MAX_LENGTH: usize = 200;

/// Result of a translation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Translation {
    pub pair: LanguagePair,
    pub text: String,
    /// False when source and target matched and the input was returned as-is
    pub translated: bool,
}

/// Translates text between supported languages through a [`TranslatorCache`]
#[derive(Debug)]
pub struct TranslationService {
    cache: TranslatorCache,
    max_length: usize,
}

impl TranslationService {
    pub fn new(loader: Arc<dyn TranslatorLoader>) -> Self {
        Self::with_cache(TranslatorCache::new(loader))
    }

    pub fn with_cache(cache: TranslatorCache) -> Self {
        Self {
            cache,
            max_length: DEFAULT_TRANSLATION_MAX_LENGTH,
        }
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    pub fn cache(&self) -> &TranslatorCache {
        &self.cache
    }

    /// Translate `text` from `source` to `target` (names or codes)
    pub async fn translate(&self, text: &str, source: &str, target: &str) -> Result<Translation> {
        if text.trim().is_empty() {
            return Err(Error::EmptyInput("translate".to_string()));
        }

        let pair = LanguagePair::parse(source, target)?;
        if pair.is_identity() {
            debug!(pair = %pair, "Source and target match, returning input");
            return Ok(Translation {
                pair,
                text: text.to_string(),
                translated: false,
            });
        }

        let translator =
            self.cache
                .get_or_load(pair)
                .await?
                .ok_or_else(|| Error::TranslationUnavailable {
                    from: pair.source.code.to_string(),
                    to: pair.target.code.to_string(),
                })?;

        let output = translator.translate(text, self.max_length).await?;
        Ok(Translation {
            pair,
            text: output.trim().to_string(),
            translated: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translate::cache::testing::CountingLoader;

    fn service(available: Vec<&'static str>) -> (TranslationService, Arc<CountingLoader>) {
        let loader = Arc::new(CountingLoader::new(available));
        (TranslationService::new(loader.clone()), loader)
    }

    #[tokio::test]
    async fn test_translate() {
        let (service, _) = service(vec!["fr"]);
        let result = service.translate("Hello", "English", "French").await.unwrap();

        assert_eq!(result.text, "[fr] Hello");
        assert!(result.translated);
        assert_eq!(result.pair.to_string(), "en -> fr");
    }

    #[tokio::test]
    async fn test_same_language_skips_loading() {
        let (service, loader) = service(vec![]);
        let result = service.translate("Hola", "es", "Spanish").await.unwrap();

        assert_eq!(result.text, "Hola");
        assert!(!result.translated);
        assert_eq!(loader.loads(), 0);
    }

    #[tokio::test]
    async fn test_blank_text() {
        let (service, loader) = service(vec!["fr"]);
        let err = service.translate("   ", "en", "fr").await.unwrap_err();

        assert!(matches!(err, Error::EmptyInput(_)));
        assert_eq!(loader.loads(), 0);
    }

    #[tokio::test]
    async fn test_unavailable_pair() {
        let (service, _) = service(vec!["fr"]);
        let err = service.translate("Hello", "en", "hi").await.unwrap_err();

        match err {
            Error::TranslationUnavailable { from, to } => {
                assert_eq!(from, "en");
                assert_eq!(to, "hi");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unknown_language() {
        let (service, _) = service(vec!["fr"]);
        let err = service.translate("Hello", "en", "xx-none").await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_translator_reused_across_calls() {
        let (service, loader) = service(vec!["de"]);
        service.translate("one", "en", "de").await.unwrap();
        service.translate("two", "en", "de").await.unwrap();

        assert_eq!(loader.loads(), 1);
        assert_eq!(service.cache().len(), 1);
    }
}
