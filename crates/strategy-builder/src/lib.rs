//! # strategy-builder
//!
//! Multi-step wizard that collects crypto trading parameters and turns them
//! into a strategy prompt for an LLM.
//!
//! ## Flow
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Select Token → Foundational → Sentiment → Research         │
//! │       (optional steps may be skipped)                       │
//! │  → Parameters → Risk Management → Swap for Profit           │
//! │  → Strategy String (review) → Generated Strategy            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  StrategyWizard ──▶ PromptComposer ──▶ StrategyLlm          │
//! │        ▲                                   │                │
//! │        └──────── GeneratedStrategy ◀───────┘                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use strategy_builder::{StrategyWizard, WizardLayout};
//!
//! let mut wizard = StrategyWizard::new(WizardLayout::full());
//! wizard.select_preset("btc_trend_v1").unwrap();
//! assert!(wizard.compose_prompt().contains("Asset: BTC"));
//! ```

pub mod catalog;
pub mod collab;
pub mod error;
pub mod generation;
pub mod model;
pub mod prompt;
pub mod wizard;

pub use error::{BuilderError, ErrorInfo, ErrorKind, Result, ValidationError};
pub use generation::{GenerationTicket, ProviderLlm, StrategyLlm};
pub use model::{
    CoreParameters, GeneratedStrategy, InstantSwap, ModelTarget, RiskManagement, SentimentReport,
    StrategyParameters, TokenInfo,
};
pub use prompt::{AuxiliaryInputs, PromptComposer, SectionNumbering};
pub use wizard::{StepKind, StepPayload, StrategyWizard, WizardLayout, WizardView};
