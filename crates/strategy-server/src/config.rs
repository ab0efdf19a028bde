//! Server Configuration
//!
//! Everything is read from the environment (after `.env` is loaded).

use std::str::FromStr;
use std::time::Duration;

use strategy_builder::{SectionNumbering, WizardLayout};
use strategy_runtime::translation::DEFAULT_LIBRETRANSLATE_URL;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Which LLM backend serves generation requests
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LlmBackend {
    #[default]
    Gemini,
    Ollama,
    /// Gemini first, Ollama when Gemini fails with a retryable error
    Failover,
}

impl FromStr for LlmBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(LlmBackend::Gemini),
            "ollama" => Ok(LlmBackend::Ollama),
            "failover" => Ok(LlmBackend::Failover),
            other => Err(format!("unknown LLM backend '{}'", other)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub llm_backend: LlmBackend,
    /// Model override for a single-provider backend; `None` lets the
    /// provider use its configured model
    pub llm_model: Option<String>,
    /// Layout given to every new wizard
    pub layout: WizardLayout,
    pub numbering: SectionNumbering,
    /// Per-attempt bound used by the failover chain
    pub llm_timeout: Duration,
    /// Wizards untouched for this long are dropped
    pub session_idle: Duration,
    pub translation_cache_ttl: Duration,
    pub translation_cache_capacity: usize,
    pub libretranslate_url: String,
    pub google_translate_api_key: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".into(),
            llm_backend: LlmBackend::default(),
            llm_model: None,
            layout: WizardLayout::default(),
            numbering: SectionNumbering::default(),
            llm_timeout: Duration::from_secs(120),
            session_idle: Duration::from_secs(30 * 60),
            translation_cache_ttl: Duration::from_secs(3600),
            translation_cache_capacity: 1000,
            libretranslate_url: DEFAULT_LIBRETRANSLATE_URL.into(),
            google_translate_api_key: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or blank keys keep their defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(addr) = get("BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Some(raw) = get("LLM_PROVIDER") {
            config.llm_backend = parse("LLM_PROVIDER", &raw)?;
        }
        config.llm_model = get("LLM_MODEL");
        if let Some(raw) = get("WIZARD_LAYOUT") {
            config.layout = parse("WIZARD_LAYOUT", &raw)?;
        }
        if let Some(raw) = get("PROMPT_NUMBERING") {
            config.numbering = parse("PROMPT_NUMBERING", &raw)?;
        }
        if let Some(raw) = get("LLM_TIMEOUT_SECS") {
            config.llm_timeout = Duration::from_secs(parse("LLM_TIMEOUT_SECS", &raw)?);
        }
        if let Some(raw) = get("SESSION_IDLE_SECS") {
            config.session_idle = Duration::from_secs(parse("SESSION_IDLE_SECS", &raw)?);
        }
        if let Some(raw) = get("TRANSLATION_CACHE_TTL_SECS") {
            config.translation_cache_ttl =
                Duration::from_secs(parse("TRANSLATION_CACHE_TTL_SECS", &raw)?);
        }
        if let Some(raw) = get("TRANSLATION_CACHE_CAPACITY") {
            config.translation_cache_capacity = parse("TRANSLATION_CACHE_CAPACITY", &raw)?;
        }
        if let Some(url) = get("LIBRETRANSLATE_URL") {
            config.libretranslate_url = url;
        }
        config.google_translate_api_key = get("GOOGLE_TRANSLATE_API_KEY");

        Ok(config)
    }

    /// `LLM_MODEL` for the selected backend. A failover chain mixes
    /// providers, so each keeps its own `GEMINI_MODEL` / `OLLAMA_MODEL`.
    pub fn model_override(&self) -> Option<&str> {
        match self.llm_backend {
            LlmBackend::Gemini | LlmBackend::Ollama => self.llm_model.as_deref(),
            LlmBackend::Failover => None,
        }
    }
}

fn parse<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.llm_backend, LlmBackend::Gemini);
        assert_eq!(config.layout.name, "full");
        assert_eq!(config.numbering, SectionNumbering::Sequential);
        assert_eq!(config.session_idle, Duration::from_secs(1800));
        assert!(config.google_translate_api_key.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("LLM_PROVIDER", "Failover"),
            ("WIZARD_LAYOUT", "classic"),
            ("PROMPT_NUMBERING", "sequential"),
            ("SESSION_IDLE_SECS", "60"),
            ("TRANSLATION_CACHE_CAPACITY", "5"),
            ("GOOGLE_TRANSLATE_API_KEY", "  "),
        ]))
        .unwrap();
        assert_eq!(config.llm_backend, LlmBackend::Failover);
        assert_eq!(config.layout.len(), 6);
        assert_eq!(config.numbering, SectionNumbering::Stable);
        assert_eq!(config.session_idle, Duration::from_secs(60));
        assert_eq!(config.translation_cache_capacity, 5);
        assert!(config.google_translate_api_key.is_none());
    }

    #[test]
    fn test_model_override_only_for_single_backend() {
        let ollama = ServerConfig::from_lookup(lookup(&[
            ("LLM_PROVIDER", "ollama"),
            ("LLM_MODEL", "mistral"),
        ]))
        .unwrap();
        assert_eq!(ollama.model_override(), Some("mistral"));

        let failover = ServerConfig::from_lookup(lookup(&[
            ("LLM_PROVIDER", "failover"),
            ("LLM_MODEL", "gemini-1.5-pro"),
        ]))
        .unwrap();
        assert_eq!(failover.model_override(), None);

        let unset = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(unset.model_override(), None);
    }

    #[test]
    fn test_invalid_value_names_the_key() {
        let err = ServerConfig::from_lookup(lookup(&[("SESSION_IDLE_SECS", "soon")])).unwrap_err();
        assert!(err.to_string().starts_with("SESSION_IDLE_SECS"));

        let err = ServerConfig::from_lookup(lookup(&[("LLM_PROVIDER", "gpt")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "LLM_PROVIDER", .. }));
    }
}
