//! Configuration management with file persistence

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Environment variables checked, in order, for the LLM API key
pub const API_KEY_ENV_VARS: [&str; 2] = ["CONDENSE_API_KEY", "GROQ_API_KEY"];

/// Upper limit for `digest.recent_days`
pub const MAX_RECENT_DAYS: i64 = 3650;

/// condense configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub llm: LlmConfig,
    pub summarize: SummarizeConfig,
    pub translate: TranslateConfig,
    pub digest: DigestConfig,
    pub posts: PostsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    #[serde(skip)]
    pub api_key: Option<String>,
    pub base_url: String,
    pub default_model: String,
    pub fallback_models: Vec<String>,
    pub temperature: f32,
    pub max_tokens: usize,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizeConfig {
    pub chunk_max_chars: usize,
    pub combine_threshold: usize,
    pub chunk_max_length: usize,
    pub chunk_min_length: usize,
    pub final_max_length: usize,
    pub final_min_length: usize,
    pub single_max_length: usize,
    pub single_min_length: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslateConfig {
    pub max_length: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DigestConfig {
    pub max_sites: usize,
    pub articles_per_site: usize,
    pub recent_days: i64,
    pub probe_entries: usize,
    pub summary_max_length: usize,
    pub summary_min_length: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostsConfig {
    pub history_limit: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.groq.com/openai/v1".to_string(),
            default_model: "llama-3.1-8b-instant".to_string(),
            fallback_models: Vec::new(),
            temperature: 0.7,
            max_tokens: 500,
            timeout_secs: 30,
        }
    }
}

impl Default for SummarizeConfig {
    fn default() -> Self {
        Self {
            chunk_max_chars: 1500,
            combine_threshold: 1500,
            chunk_max_length: 180,
            chunk_min_length: 60,
            final_max_length: 200,
            final_min_length: 80,
            single_max_length: 130,
            single_min_length: 30,
        }
    }
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self { max_length: 200 }
    }
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            max_sites: 10,
            articles_per_site: 2,
            recent_days: 7,
            probe_entries: 5,
            summary_max_length: 90,
            summary_min_length: 30,
        }
    }
}

impl Default for PostsConfig {
    fn default() -> Self {
        Self { history_limit: 10 }
    }
}

impl LlmConfig {
    pub fn resolved_api_key(&self) -> anyhow::Result<Option<String>> {
        self.enforce_env_only()?;

        Ok(API_KEY_ENV_VARS
            .iter()
            .find_map(|name| env::var(name).ok().filter(|v| !v.trim().is_empty())))
    }

    pub fn redacted_api_key(&self) -> anyhow::Result<Option<String>> {
        self.resolved_api_key().map(|opt| opt.map(|key| redact(&key)))
    }

    pub fn enforce_env_only(&self) -> anyhow::Result<()> {
        if self.api_key.is_some() {
            return Err(anyhow!(
                "LLM API keys must be provided via environment variables, not stored in configuration"
            ));
        }
        Ok(())
    }
}

fn redact(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        "***".to_string()
    } else {
        let suffix: String = chars[chars.len() - 4..].iter().collect();
        format!("***{}", suffix)
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        let dir = if let Ok(custom_dir) = env::var("CONDENSE_CONFIG_DIR") {
            PathBuf::from(custom_dir)
        } else {
            dirs::config_dir()
                .ok_or_else(|| anyhow!("Could not determine config directory"))?
                .join("condense")
        };
        Ok(dir)
    }

    /// Get the config file path
    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from file, or defaults if it doesn't exist
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: Config = toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> anyhow::Result<()> {
        self.validate()?;

        let dir = Self::config_dir()?;
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;

        let path = Self::config_path()?;
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        self.llm.enforce_env_only()?;

        let s = &self.summarize;
        if s.chunk_max_chars == 0 {
            return Err(anyhow!("summarize.chunk_max_chars must be positive"));
        }
        check_bounds("summarize.chunk", s.chunk_max_length, s.chunk_min_length)?;
        check_bounds("summarize.final", s.final_max_length, s.final_min_length)?;
        check_bounds("summarize.single", s.single_max_length, s.single_min_length)?;

        let d = &self.digest;
        check_bounds("digest.summary", d.summary_max_length, d.summary_min_length)?;
        if !(0..=MAX_RECENT_DAYS).contains(&d.recent_days) {
            return Err(anyhow!(
                "digest.recent_days must be between 0 and {}",
                MAX_RECENT_DAYS
            ));
        }

        if self.translate.max_length == 0 {
            return Err(anyhow!("translate.max_length must be positive"));
        }
        Ok(())
    }

    /// Get a configuration value by key
    pub fn get(&self, key: &str) -> anyhow::Result<String> {
        let value = match key {
            // LLM settings
            "llm.base_url" => self.llm.base_url.clone(),
            "llm.default_model" => self.llm.default_model.clone(),
            "llm.fallback_models" => self.llm.fallback_models.join(", "),
            "llm.temperature" => self.llm.temperature.to_string(),
            "llm.max_tokens" => self.llm.max_tokens.to_string(),
            "llm.timeout_secs" => self.llm.timeout_secs.to_string(),

            // Summarization settings
            "summarize.chunk_max_chars" => self.summarize.chunk_max_chars.to_string(),
            "summarize.combine_threshold" => self.summarize.combine_threshold.to_string(),
            "summarize.chunk_max_length" => self.summarize.chunk_max_length.to_string(),
            "summarize.chunk_min_length" => self.summarize.chunk_min_length.to_string(),
            "summarize.final_max_length" => self.summarize.final_max_length.to_string(),
            "summarize.final_min_length" => self.summarize.final_min_length.to_string(),
            "summarize.single_max_length" => self.summarize.single_max_length.to_string(),
            "summarize.single_min_length" => self.summarize.single_min_length.to_string(),

            // Translation settings
            "translate.max_length" => self.translate.max_length.to_string(),

            // Digest settings
            "digest.max_sites" => self.digest.max_sites.to_string(),
            "digest.articles_per_site" => self.digest.articles_per_site.to_string(),
            "digest.recent_days" => self.digest.recent_days.to_string(),
            "digest.probe_entries" => self.digest.probe_entries.to_string(),
            "digest.summary_max_length" => self.digest.summary_max_length.to_string(),
            "digest.summary_min_length" => self.digest.summary_min_length.to_string(),

            // Post settings
            "posts.history_limit" => self.posts.history_limit.to_string(),

            // API key (special handling - show redacted)
            "llm.api_key" | "api_key" => match self.llm.redacted_api_key()? {
                Some(redacted) => redacted,
                None => "(not set - use CONDENSE_API_KEY or GROQ_API_KEY env var)".to_string(),
            },

            _ => {
                return Err(anyhow!(
                    "Unknown configuration key: {}. Use `condense config list` to see available keys.",
                    key
                ));
            }
        };
        Ok(value)
    }

    /// Set a configuration value by key
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            // LLM settings
            "llm.base_url" => {
                let trimmed = value.trim().trim_end_matches('/');
                if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
                    return Err(anyhow!("Base URL must start with http:// or https://"));
                }
                self.llm.base_url = trimmed.to_string();
            }
            "llm.default_model" => {
                self.llm.default_model = value.to_string();
            }
            "llm.fallback_models" => {
                self.llm.fallback_models = value
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
            }
            "llm.temperature" => {
                let temp: f32 = value
                    .parse()
                    .with_context(|| format!("Invalid temperature value: {}", value))?;
                if !(0.0..=2.0).contains(&temp) {
                    return Err(anyhow!("Temperature must be between 0.0 and 2.0"));
                }
                self.llm.temperature = temp;
            }
            "llm.max_tokens" => self.llm.max_tokens = parse_positive(key, value)?,
            "llm.timeout_secs" => {
                self.llm.timeout_secs = value
                    .parse()
                    .with_context(|| format!("Invalid timeout_secs value: {}", value))?;
            }

            // Summarization settings
            "summarize.chunk_max_chars" => {
                self.summarize.chunk_max_chars = parse_positive(key, value)?
            }
            "summarize.combine_threshold" => {
                self.summarize.combine_threshold = parse_positive(key, value)?
            }
            "summarize.chunk_max_length" => {
                self.summarize.chunk_max_length = parse_positive(key, value)?
            }
            "summarize.chunk_min_length" => {
                self.summarize.chunk_min_length = parse_count(key, value)?
            }
            "summarize.final_max_length" => {
                self.summarize.final_max_length = parse_positive(key, value)?
            }
            "summarize.final_min_length" => {
                self.summarize.final_min_length = parse_count(key, value)?
            }
            "summarize.single_max_length" => {
                self.summarize.single_max_length = parse_positive(key, value)?
            }
            "summarize.single_min_length" => {
                self.summarize.single_min_length = parse_count(key, value)?
            }

            // Translation settings
            "translate.max_length" => self.translate.max_length = parse_positive(key, value)?,

            // Digest settings
            "digest.max_sites" => self.digest.max_sites = parse_positive(key, value)?,
            "digest.articles_per_site" => {
                self.digest.articles_per_site = parse_positive(key, value)?
            }
            "digest.recent_days" => {
                self.digest.recent_days = i64::try_from(parse_count(key, value)?)
                    .with_context(|| format!("Invalid {} value: {}", key, value))?;
            }
            "digest.probe_entries" => self.digest.probe_entries = parse_positive(key, value)?,
            "digest.summary_max_length" => {
                self.digest.summary_max_length = parse_positive(key, value)?
            }
            "digest.summary_min_length" => {
                self.digest.summary_min_length = parse_count(key, value)?
            }

            // Post settings
            "posts.history_limit" => self.posts.history_limit = parse_positive(key, value)?,

            // API key cannot be set via config
            "llm.api_key" | "api_key" => {
                return Err(anyhow!(
                    "API keys cannot be stored in configuration for security. \
                     Set the CONDENSE_API_KEY or GROQ_API_KEY environment variable instead."
                ));
            }

            _ => {
                return Err(anyhow!(
                    "Unknown configuration key: {}. Use `condense config list` to see available keys.",
                    key
                ));
            }
        }

        self.validate()
    }

    /// List all configuration keys and their values
    pub fn list(&self) -> anyhow::Result<Vec<(String, String)>> {
        let keys = [
            "llm.base_url",
            "llm.default_model",
            "llm.fallback_models",
            "llm.temperature",
            "llm.max_tokens",
            "llm.timeout_secs",
            "llm.api_key",
            "summarize.chunk_max_chars",
            "summarize.combine_threshold",
            "summarize.chunk_max_length",
            "summarize.chunk_min_length",
            "summarize.final_max_length",
            "summarize.final_min_length",
            "summarize.single_max_length",
            "summarize.single_min_length",
            "translate.max_length",
            "digest.max_sites",
            "digest.articles_per_site",
            "digest.recent_days",
            "digest.probe_entries",
            "digest.summary_max_length",
            "digest.summary_min_length",
            "posts.history_limit",
        ];

        keys.into_iter()
            .map(|key| {
                let value = self.get(key)?;
                Ok((key.to_string(), value))
            })
            .collect()
    }

    /// Reset configuration to defaults
    pub fn reset() -> anyhow::Result<()> {
        let path = Self::config_path()?;
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove config file: {}", path.display()))?;
        }
        Ok(())
    }
}

fn parse_count(key: &str, value: &str) -> anyhow::Result<usize> {
    value
        .trim()
        .parse()
        .with_context(|| format!("Invalid {} value: {}", key, value))
}

fn parse_positive(key: &str, value: &str) -> anyhow::Result<usize> {
    let parsed = parse_count(key, value)?;
    if parsed == 0 {
        return Err(anyhow!("{} must be greater than zero", key));
    }
    Ok(parsed)
}

fn check_bounds(prefix: &str, max: usize, min: usize) -> anyhow::Result<()> {
    if max == 0 {
        return Err(anyhow!("{}_max_length must be positive", prefix));
    }
    if min > max {
        return Err(anyhow!(
            "{}_min_length ({}) must not exceed {}_max_length ({})",
            prefix,
            min,
            prefix,
            max
        ));
    }
    Ok(())
}
