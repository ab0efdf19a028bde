//! Strategy Generation
//!
//! The wizard talks to the LLM through `StrategyLlm`: one prompt in, strategy
//! text out. Failures are always a `GenerationError`, never an empty string.

use std::sync::Arc;

use async_trait::async_trait;
use strategy_core::{GenerationError, GenerationOptions, LlmProvider, Message};
use tracing::{info, warn};

use crate::model::ModelTarget;

/// LLM client boundary used by the wizard
#[async_trait]
pub trait StrategyLlm: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Adapts any `LlmProvider` to `StrategyLlm`
pub struct ProviderLlm {
    provider: Arc<dyn LlmProvider>,
    options: GenerationOptions,
}

impl ProviderLlm {
    pub fn new(provider: Arc<dyn LlmProvider>, options: GenerationOptions) -> Self {
        Self { provider, options }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }
}

#[async_trait]
impl StrategyLlm for ProviderLlm {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        info!(
            provider = self.provider.name(),
            model = %self.options.model,
            prompt_chars = prompt.len(),
            "Generating strategy"
        );

        let completion = self
            .provider
            .complete(&[Message::user(prompt)], &self.options)
            .await
            .inspect_err(|e| warn!(error = %e, "Strategy generation failed"))?;

        if completion.content.trim().is_empty() {
            warn!(model = %completion.model, "Provider returned empty strategy");
            return Err(GenerationError::EmptyResponse);
        }

        info!(
            model = %completion.model,
            chars = completion.content.len(),
            "Strategy generated"
        );
        Ok(completion.content)
    }
}

/// Handle for one in-flight generation attempt
///
/// Issued by `StrategyWizard::begin_generation` and redeemed with
/// `complete_generation`. Tickets from abandoned attempts are ignored.
#[derive(Clone, Debug)]
pub struct GenerationTicket {
    pub attempt: u64,
    pub prompt: String,
    pub model_target: ModelTarget,
}
