//! Configuration for debate sessions.
//!
//! [`DebateSettings`] carries the per-debate model parameters chosen by the caller (the
//! "configure" entry point), while [`DebateConfig`] holds process-wide settings: credentials,
//! defaults and where corpus documents live. Both are plain structs; no config-file parsing
//! dependencies are involved.
//!
//! # Example
//!
//! ```rust
//! use debatellm::DebateConfig;
//!
//! let config = DebateConfig {
//!     groq_api_key: Some("gsk_test".into()),
//!     ..DebateConfig::default()
//! };
//! let settings = config.settings();
//! assert_eq!(settings.model, "llama-3.1-8b-instant");
//! assert!(settings.validate().is_ok());
//! ```

use crate::clients::groq::GROQ_BASE_URL;
use crate::corpus::SentenceSplitter;
use crate::error::DebateError;
use std::path::PathBuf;

pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_SIMILARITY_TOP_K: usize = 5;
pub const DEFAULT_MAX_TOKENS: usize = 8_192;

/// Model parameters shared by the three participants of one debate.
#[derive(Debug, Clone, PartialEq)]
pub struct DebateSettings {
    /// Provider model identifier (e.g. `"llama-3.3-70b-versatile"`).
    pub model: String,
    /// Sampling temperature, `0.0..=2.0`.
    pub temperature: f32,
    /// Number of corpus passages retrieved per message.
    pub similarity_top_k: usize,
    /// Context window budget for each participant's memory.
    pub max_tokens: usize,
}

impl Default for DebateSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            similarity_top_k: DEFAULT_SIMILARITY_TOP_K,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl DebateSettings {
    pub fn new(model: impl Into<String>, temperature: f32) -> Self {
        Self {
            model: model.into(),
            temperature,
            ..Self::default()
        }
    }

    /// Reject settings no backend could be built from.
    pub fn validate(&self) -> Result<(), DebateError> {
        if self.model.trim().is_empty() {
            return Err(DebateError::Configuration("model identifier is empty".into()));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(DebateError::Configuration(format!(
                "temperature {} is outside 0.0..=2.0",
                self.temperature
            )));
        }
        if self.similarity_top_k == 0 {
            return Err(DebateError::Configuration(
                "similarity_top_k must be at least 1".into(),
            ));
        }
        if self.max_tokens == 0 {
            return Err(DebateError::Configuration(
                "max_tokens must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// Process-wide configuration.
#[derive(Debug, Clone)]
pub struct DebateConfig {
    /// Groq API key; required before any Groq backed debate can be built.
    pub groq_api_key: Option<String>,
    /// OpenAI compatible base URL the backends talk to.
    pub base_url: String,
    /// Default model offered to the configure entry point.
    pub model: String,
    pub temperature: f32,
    pub similarity_top_k: usize,
    pub max_tokens: usize,
    /// Directory holding the uploaded `.txt` corpus.
    pub data_dir: PathBuf,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for DebateConfig {
    fn default() -> Self {
        let splitter = SentenceSplitter::default();
        Self {
            groq_api_key: None,
            base_url: GROQ_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            similarity_top_k: DEFAULT_SIMILARITY_TOP_K,
            max_tokens: DEFAULT_MAX_TOKENS,
            data_dir: PathBuf::from("data"),
            chunk_size: splitter.chunk_size,
            chunk_overlap: splitter.chunk_overlap,
        }
    }
}

impl DebateConfig {
    /// Build a config from the environment, falling back to defaults for anything unset
    /// or unparsable.
    ///
    /// Reads `GROQ_API_KEY`, `GROQ_BASE_URL`, `DEBATE_MODEL`, `DEBATE_TEMPERATURE`,
    /// `DEBATE_TOP_K`, `DEBATE_MAX_TOKENS` and `DEBATE_DATA_DIR`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but with an explicit variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            groq_api_key: non_empty("GROQ_API_KEY"),
            base_url: non_empty("GROQ_BASE_URL").unwrap_or(defaults.base_url),
            model: non_empty("DEBATE_MODEL").unwrap_or(defaults.model),
            temperature: parse_or(non_empty("DEBATE_TEMPERATURE"), defaults.temperature),
            similarity_top_k: parse_or(non_empty("DEBATE_TOP_K"), defaults.similarity_top_k),
            max_tokens: parse_or(non_empty("DEBATE_MAX_TOKENS"), defaults.max_tokens),
            data_dir: non_empty("DEBATE_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            chunk_size: defaults.chunk_size,
            chunk_overlap: defaults.chunk_overlap,
        }
    }

    /// Default per-debate settings derived from this config.
    pub fn settings(&self) -> DebateSettings {
        DebateSettings {
            model: self.model.clone(),
            temperature: self.temperature,
            similarity_top_k: self.similarity_top_k,
            max_tokens: self.max_tokens,
        }
    }

    pub fn splitter(&self) -> Result<SentenceSplitter, DebateError> {
        SentenceSplitter::new(self.chunk_size, self.chunk_overlap)
    }

    pub fn require_api_key(&self) -> Result<&str, DebateError> {
        self.groq_api_key
            .as_deref()
            .ok_or_else(|| DebateError::Configuration("GROQ_API_KEY is not set".into()))
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    match value {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring unparsable configuration value {:?}", raw);
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn lookup_overrides_defaults() {
        let vars: HashMap<&str, &str> = [
            ("GROQ_API_KEY", "gsk_123"),
            ("DEBATE_MODEL", "llama-3.3-70b-versatile"),
            ("DEBATE_TEMPERATURE", "0.2"),
            ("DEBATE_TOP_K", "not-a-number"),
            ("DEBATE_DATA_DIR", "/srv/debate"),
        ]
        .into_iter()
        .collect();

        let config = DebateConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.require_api_key().unwrap(), "gsk_123");
        assert_eq!(config.model, "llama-3.3-70b-versatile");
        assert_eq!(config.temperature, 0.2);
        assert_eq!(config.similarity_top_k, DEFAULT_SIMILARITY_TOP_K);
        assert_eq!(config.data_dir, PathBuf::from("/srv/debate"));
        assert_eq!(config.base_url, GROQ_BASE_URL);
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let config = DebateConfig::from_lookup(|k| (k == "GROQ_API_KEY").then(|| "  ".into()));
        assert!(matches!(
            config.require_api_key(),
            Err(DebateError::Configuration(_))
        ));
    }

    #[test]
    fn settings_validation() {
        assert!(DebateSettings::default().validate().is_ok());
        assert!(DebateSettings::new("", 0.7).validate().is_err());
        assert!(DebateSettings::new("m", 2.5).validate().is_err());
        let mut settings = DebateSettings::default();
        settings.similarity_top_k = 0;
        assert!(settings.validate().is_err());
    }
}
