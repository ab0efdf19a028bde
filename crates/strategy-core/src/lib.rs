//! # strategy-core
//!
//! Provider-agnostic LLM boundary used by the strategy builder.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Strategy Builder                         │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────────┐  │
//! │  │    Wizard    │──▶│   Prompt     │──▶│   LlmProvider    │  │
//! │  │ State Machine│   │   Composer   │   │   (Strategy)     │  │
//! │  └──────────────┘   └──────────────┘   └──────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `LlmProvider` trait enables swapping between Gemini, Ollama, or any
//! other backend without changing wizard logic.

pub mod error;
pub mod message;
pub mod provider;

pub use error::{GenerationError, Result};
pub use message::{Message, Role};
pub use provider::{
    Completion, GenerationOptions, LlmProvider, ModelInfo, ProviderChain, ProviderStrategy,
};
