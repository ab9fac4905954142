//! Supported languages and language pairs

use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};

/// A language with its ISO 639-1 code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Language {
    pub name: &'static str,
    pub code: &'static str,
}

const fn lang(name: &'static str, code: &'static str) -> Language {
    Language { name, code }
}

/// Every language the translator accepts, sorted by name
pub static LANGUAGES: &[Language] = &[
    lang("Afrikaans", "af"),
    lang("Arabic", "ar"),
    lang("Bulgarian", "bg"),
    lang("Catalan", "ca"),
    lang("Chinese", "zh"),
    lang("Czech", "cs"),
    lang("Danish", "da"),
    lang("Dutch", "nl"),
    lang("English", "en"),
    lang("Estonian", "et"),
    lang("Finnish", "fi"),
    lang("French", "fr"),
    lang("German", "de"),
    lang("Greek", "el"),
    lang("Hebrew", "he"),
    lang("Hindi", "hi"),
    lang("Hungarian", "hu"),
    lang("Icelandic", "is"),
    lang("Indonesian", "id"),
    lang("Italian", "it"),
    lang("Japanese", "ja"),
    lang("Korean", "ko"),
    lang("Latvian", "lv"),
    lang("Lithuanian", "lt"),
    lang("Malay", "ms"),
    lang("Norwegian", "no"),
    lang("Persian", "fa"),
    lang("Polish", "pl"),
    lang("Portuguese", "pt"),
    lang("Romanian", "ro"),
    lang("Russian", "ru"),
    lang("Slovak", "sk"),
    lang("Slovenian", "sl"),
    lang("Spanish", "es"),
    lang("Swahili", "sw"),
    lang("Swedish", "sv"),
    lang("Tagalog", "tl"),
    lang("Thai", "th"),
    lang("Turkish", "tr"),
    lang("Ukrainian", "uk"),
    lang("Urdu", "ur"),
    lang("Vietnamese", "vi"),
];

/// Look up a language by name or code, ignoring case
pub fn find_language(query: &str) -> Option<&'static Language> {
    let query = query.trim();
    LANGUAGES
        .iter()
        .find(|l| l.code.eq_ignore_ascii_case(query) || l.name.eq_ignore_ascii_case(query))
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.code)
    }
}

/// Direction of a translation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct LanguagePair {
    pub source: Language,
    pub target: Language,
}

impl LanguagePair {
    pub fn new(source: Language, target: Language) -> Self {
        Self { source, target }
    }

    /// Resolve both ends by name or code
    pub fn parse(source: &str, target: &str) -> Result<Self> {
        let resolve = |query: &str| {
            find_language(query).copied().ok_or_else(|| {
                Error::InvalidInput(format!(
                    "unknown language '{}'. Run `condense languages` to list supported languages.",
                    query.trim()
                ))
            })
        };
        Ok(Self::new(resolve(source)?, resolve(target)?))
    }

    pub fn is_identity(&self) -> bool {
        self.source == self.target
    }

    /// Name of the opus-mt model covering this direction
    pub fn model_name(&self) -> String {
        format!(
            "Helsinki-NLP/opus-mt-{}-{}",
            self.source.code, self.target.code
        )
    }
}

impl fmt::Display for LanguagePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source.code, self.target.code)
    }
}
