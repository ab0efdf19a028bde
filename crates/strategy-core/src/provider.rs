//! LLM Provider Strategy Pattern
//!
//! Defines a common interface for all LLM backends (Gemini, Ollama, ...) so the
//! strategy generator can work with any of them without code changes.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use strategy_core::provider::{GenerationOptions, LlmProvider};
//!
//! let provider = GeminiProvider::from_env()?;
//! let completion = provider.complete(&[Message::user(prompt)], &options).await?;
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{GenerationError, Result};
use crate::message::Message;

/// Configuration for LLM generation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Model identifier (e.g., "gemini-1.5-flash", "llama3.2").
    /// Empty means the provider's configured model.
    pub model: String,

    /// Temperature for sampling (0.0 = deterministic, 1.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Top-p nucleus sampling
    #[serde(default = "default_top_p")]
    pub top_p: f32,
}

const fn default_temperature() -> f32 { 0.7 }
const fn default_max_tokens() -> u32 { 4096 }
const fn default_top_p() -> f32 { 0.9 }

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            model: String::new(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            top_p: default_top_p(),
        }
    }
}

impl GenerationOptions {
    /// Same options, different model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

/// Response from an LLM completion
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Completion {
    /// The generated text
    pub content: String,

    /// Model that generated this response
    pub model: String,

    /// Token usage statistics (if available)
    pub usage: Option<TokenUsage>,

    /// Finish reason
    pub finish_reason: Option<FinishReason>,
}

/// Token usage statistics
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Reason for completion finishing
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ContentFilter,
    Error,
}

impl FinishReason {
    /// Map a provider-specific finish string
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_uppercase().as_str() {
            "STOP" => FinishReason::Stop,
            "MAX_TOKENS" | "LENGTH" => FinishReason::Length,
            "SAFETY" | "RECITATION" | "BLOCKLIST" | "CONTENT_FILTER" => FinishReason::ContentFilter,
            _ => FinishReason::Error,
        }
    }
}

/// Provider metadata
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Provider name (e.g., "Gemini", "Ollama")
    pub name: String,

    /// Available models
    pub models: Vec<ModelInfo>,
}

/// Information about a model
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub name: String,
    pub context_length: Option<u32>,
}

/// Strategy trait for LLM providers
///
/// Implement this trait to add support for new LLM backends.
/// The generator works exclusively through this interface.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name for logs and health output
    fn name(&self) -> &str;

    /// Get provider information and capabilities
    async fn info(&self) -> Result<ProviderInfo> {
        Ok(ProviderInfo {
            name: self.name().to_string(),
            models: self.list_models().await.unwrap_or_default(),
        })
    }

    /// Check if the provider is available and configured correctly
    async fn health_check(&self) -> Result<bool>;

    /// Generate a completion from messages
    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion>;

    /// List available models
    async fn list_models(&self) -> Result<Vec<ModelInfo>>;

    /// Estimate token count for text (provider-specific tokenization)
    fn estimate_tokens(&self, text: &str) -> u32 {
        // Default: rough estimate of ~4 chars per token
        u32::try_from(text.len() / 4).unwrap_or(u32::MAX)
    }
}

/// Provider selection strategy
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderStrategy {
    /// Use the first provider only
    Single,

    /// Try providers in order until one succeeds with a retryable failure in between
    Failover,

    /// Round-robin load balancing
    RoundRobin,
}

/// Multi-provider wrapper with failover support
///
/// Each attempt can be bounded by a timeout; an expired attempt is reported
/// as [`GenerationError::Transport`].
pub struct ProviderChain {
    providers: Vec<Box<dyn LlmProvider>>,
    strategy: ProviderStrategy,
    attempt_timeout: Option<Duration>,
    current_index: AtomicUsize,
}

impl ProviderChain {
    pub fn new(providers: Vec<Box<dyn LlmProvider>>, strategy: ProviderStrategy) -> Self {
        Self {
            providers,
            strategy,
            attempt_timeout: None,
            current_index: AtomicUsize::new(0),
        }
    }

    /// Bound every provider attempt
    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = Some(timeout);
        self
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Get the next provider based on strategy
    pub fn next_provider(&self) -> Option<&dyn LlmProvider> {
        if self.providers.is_empty() {
            return None;
        }

        let idx = match self.strategy {
            ProviderStrategy::Single => 0,
            ProviderStrategy::RoundRobin => self.current_index.fetch_add(1, Ordering::SeqCst),
            ProviderStrategy::Failover => self.current_index.load(Ordering::SeqCst),
        };
        Some(self.providers[idx % self.providers.len()].as_ref())
    }

    /// Advance to next provider (for failover)
    pub fn advance(&self) {
        self.current_index.fetch_add(1, Ordering::SeqCst);
    }

    async fn attempt(
        &self,
        provider: &dyn LlmProvider,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        match self.attempt_timeout {
            Some(limit) => tokio::time::timeout(limit, provider.complete(messages, options))
                .await
                .map_err(|_| {
                    GenerationError::Transport(format!(
                        "{} did not answer within {}s",
                        provider.name(),
                        limit.as_secs()
                    ))
                })?,
            None => provider.complete(messages, options).await,
        }
    }
}

#[async_trait]
impl LlmProvider for ProviderChain {
    fn name(&self) -> &str {
        "ProviderChain"
    }

    async fn health_check(&self) -> Result<bool> {
        for provider in &self.providers {
            if provider.health_check().await.unwrap_or(false) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        let attempts = match self.strategy {
            ProviderStrategy::Failover => self.providers.len(),
            ProviderStrategy::Single | ProviderStrategy::RoundRobin => 1,
        };

        let mut last_error = GenerationError::Config("No providers configured".into());
        for _ in 0..attempts {
            let Some(provider) = self.next_provider() else {
                break;
            };

            match self.attempt(provider, messages, options).await {
                Ok(completion) => return Ok(completion),
                Err(e) if self.strategy == ProviderStrategy::Failover && e.is_retryable() => {
                    tracing::warn!(provider = provider.name(), error = %e, "Provider failed, failing over");
                    self.advance();
                    last_error = e;
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error)
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let mut models = Vec::new();
        for provider in &self.providers {
            if let Ok(mut found) = provider.list_models().await {
                models.append(&mut found);
            }
        }
        Ok(models)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedProvider {
        name: &'static str,
        reply: std::result::Result<&'static str, fn() -> GenerationError>,
    }

    #[async_trait]
    impl LlmProvider for FixedProvider {
        fn name(&self) -> &str {
            self.name
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(self.reply.is_ok())
        }

        async fn complete(
            &self,
            _messages: &[Message],
            options: &GenerationOptions,
        ) -> Result<Completion> {
            match self.reply {
                Ok(text) => Ok(Completion {
                    content: text.into(),
                    model: options.model.clone(),
                    usage: None,
                    finish_reason: Some(FinishReason::Stop),
                }),
                Err(make) => Err(make()),
            }
        }

        async fn list_models(&self) -> Result<Vec<ModelInfo>> {
            Ok(vec![ModelInfo { id: self.name.into(), name: self.name.into(), context_length: None }])
        }
    }

    fn transport() -> GenerationError {
        GenerationError::Transport("connection refused".into())
    }

    fn auth() -> GenerationError {
        GenerationError::Auth("bad key".into())
    }

    #[test]
    fn test_generation_options_defaults() {
        let opts = GenerationOptions::default();
        assert_eq!(opts.temperature, 0.7);
        assert_eq!(opts.max_tokens, 4096);
        assert!(opts.model.is_empty());
    }

    #[test]
    fn test_finish_reason_parse() {
        assert_eq!(FinishReason::parse("STOP"), FinishReason::Stop);
        assert_eq!(FinishReason::parse("MAX_TOKENS"), FinishReason::Length);
        assert_eq!(FinishReason::parse("SAFETY"), FinishReason::ContentFilter);
    }

    #[tokio::test]
    async fn test_failover_moves_past_transport_errors() {
        let chain = ProviderChain::new(
            vec![
                Box::new(FixedProvider { name: "down", reply: Err(transport) }),
                Box::new(FixedProvider { name: "up", reply: Ok("strategy") }),
            ],
            ProviderStrategy::Failover,
        );

        let completion = chain
            .complete(&[Message::user("hi")], &GenerationOptions::default())
            .await
            .unwrap();
        assert_eq!(completion.content, "strategy");
    }

    #[tokio::test]
    async fn test_failover_stops_on_non_retryable_error() {
        let chain = ProviderChain::new(
            vec![
                Box::new(FixedProvider { name: "bad-key", reply: Err(auth) }),
                Box::new(FixedProvider { name: "up", reply: Ok("strategy") }),
            ],
            ProviderStrategy::Failover,
        );

        let err = chain
            .complete(&[Message::user("hi")], &GenerationOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Auth(_)));
    }

    #[tokio::test]
    async fn test_empty_chain_is_config_error() {
        let chain = ProviderChain::new(Vec::new(), ProviderStrategy::Failover);
        let err = chain
            .complete(&[Message::user("hi")], &GenerationOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Config(_)));
        assert!(!chain.health_check().await.unwrap());
    }
}
