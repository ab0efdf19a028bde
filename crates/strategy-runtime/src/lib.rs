//! # strategy-runtime
//!
//! Concrete providers behind the `strategy-core` boundary.
//!
//! ## Providers
//!
//! - **Gemini**: Google Generative Language REST API (default backend)
//! - **Ollama** (feature `ollama`): local inference via Ollama
//!
//! Plus the translation fallback chain used by the UI's translate widget.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use strategy_runtime::GeminiProvider;
//!
//! let provider = GeminiProvider::from_env()?;
//! let llm = ProviderLlm::new(Arc::new(provider), GenerationOptions::default());
//! ```

pub mod gemini;
#[cfg(feature = "ollama")]
pub mod ollama;
pub mod translation;

pub use gemini::{GeminiConfig, GeminiProvider};
#[cfg(feature = "ollama")]
pub use ollama::{OllamaConfig, OllamaProvider};
pub use translation::{
    Translation, TranslationCache, TranslationError, TranslationProvider, TranslationService,
};

// Re-export core types for convenience
pub use strategy_core::{GenerationError, GenerationOptions, LlmProvider, Message, Result, Role};
