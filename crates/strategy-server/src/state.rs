//! Application State

use std::sync::Arc;

use strategy_builder::collab::{ResearchSummarizer, SentimentSource};
use strategy_builder::StrategyLlm;
use strategy_core::LlmProvider;
use strategy_runtime::TranslationService;

use crate::config::ServerConfig;
use crate::session::WizardSessions;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// LLM provider (Gemini, Ollama or a failover chain)
    pub provider: Arc<dyn LlmProvider>,

    /// Strategy generation over `provider`
    pub llm: Arc<dyn StrategyLlm>,

    pub sessions: Arc<WizardSessions>,

    pub sentiment: Arc<dyn SentimentSource>,

    pub research: Arc<dyn ResearchSummarizer>,

    /// Owns the translation cache for the life of the process
    pub translation: Arc<TranslationService>,

    pub config: Arc<ServerConfig>,
}
