//! Loaded-translator cache keyed by language pair

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::{debug, info};

use super::language::LanguagePair;
use crate::error::Result;

/// Translates text in one fixed direction
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text`, producing at most `max_length` tokens
    async fn translate(&self, text: &str, max_length: usize) -> Result<String>;
}

/// Produces translators on demand
#[async_trait]
pub trait TranslatorLoader: Send + Sync {
    /// Load a translator for `pair`.
    ///
    /// `Ok(None)` means no model exists for that direction.
    async fn load(&self, pair: LanguagePair) -> Result<Option<Arc<dyn Translator>>>;
}

/// Owns loaded translators so each language pair is loaded at most once
/// per cache.
///
/// Only successful loads are kept; an unavailable pair or a failed load is
/// retried on the next request.
pub struct TranslatorCache {
    loader: Arc<dyn TranslatorLoader>,
    entries: Mutex<HashMap<LanguagePair, Arc<dyn Translator>>>,
}

impl std::fmt::Debug for TranslatorCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslatorCache")
            .field("entries", &self.len())
            .finish()
    }
}

impl TranslatorCache {
    pub fn new(loader: Arc<dyn TranslatorLoader>) -> Self {
        Self {
            loader,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<LanguagePair, Arc<dyn Translator>>> {
        // the map holds no invariants a panicking holder could break
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Return the cached translator for `pair`, loading it on a miss
    pub async fn get_or_load(&self, pair: LanguagePair) -> Result<Option<Arc<dyn Translator>>> {
        let cached = self.entries().get(&pair).cloned();
        if let Some(found) = cached {
            debug!(pair = %pair, "Translator cache hit");
            return Ok(Some(found));
        }

        info!(pair = %pair, model = %pair.model_name(), "Loading translator");
        let Some(loaded) = self.loader.load(pair).await? else {
            debug!(pair = %pair, "No translator available");
            return Ok(None);
        };

        // a concurrent miss may have loaded the same pair; keep the first
        let kept = self.entries().entry(pair).or_insert(loaded).clone();
        Ok(Some(kept))
    }

    pub fn contains(&self, pair: &LanguagePair) -> bool {
        self.entries().contains_key(pair)
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Drop the translator for `pair`; returns whether one was cached
    pub fn evict(&self, pair: &LanguagePair) -> bool {
        self.entries().remove(pair).is_some()
    }

    /// Drop every cached translator
    pub fn clear(&self) {
        self.entries().clear();
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::error::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Translator that tags text with its direction
    pub struct TaggingTranslator(pub LanguagePair);

    #[async_trait]
    impl Translator for TaggingTranslator {
        async fn translate(&self, text: &str, _max_length: usize) -> Result<String> {
            Ok(format!("[{}] {}", self.0.target.code, text))
        }
    }

    /// Loader with a fixed set of available target codes that counts loads
    pub struct CountingLoader {
        pub available: Vec<&'static str>,
        pub fail_on: Option<&'static str>,
        pub loads: AtomicUsize,
    }

    impl CountingLoader {
        pub fn new(available: Vec<&'static str>) -> Self {
            Self {
                available,
                fail_on: None,
                loads: AtomicUsize::new(0),
            }
        }

        pub fn loads(&self) -> usize {
            self.loads.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TranslatorLoader for CountingLoader {
        async fn load(&self, pair: LanguagePair) -> Result<Option<Arc<dyn Translator>>> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            if self.fail_on == Some(pair.target.code) {
                return Err(Error::Other("model download failed".to_string()));
            }
            if self.available.contains(&pair.target.code) {
                Ok(Some(Arc::new(TaggingTranslator(pair))))
            } else {
                Ok(None)
            }
        }
    }
}
