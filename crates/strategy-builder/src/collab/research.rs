//! Research document summarization via an LLM

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strategy_core::{GenerationOptions, LlmProvider, Message};
use tracing::{info, warn};

use super::ResearchSummarizer;
use crate::error::{BuilderError, Result};
use crate::model::ResearchSummary;

const COLLABORATOR: &str = "Research summarizer";
const DEFAULT_MAX_CHARS: usize = 12_000;

const SYSTEM_PROMPT: &str = "You summarize crypto research documents for traders. \
Reply with a concise summary covering the thesis, market context, catalysts and risks. \
Plain text, at most 200 words.";

/// Text extracted from an uploaded document
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchDocument {
    /// Title or file name
    pub title: String,
    pub text: String,
}

/// Summarizes documents with any `LlmProvider`
pub struct LlmResearchSummarizer {
    provider: Arc<dyn LlmProvider>,
    options: GenerationOptions,
    max_chars: usize,
}

impl LlmResearchSummarizer {
    pub fn new(provider: Arc<dyn LlmProvider>, options: GenerationOptions) -> Self {
        Self {
            provider,
            options,
            max_chars: DEFAULT_MAX_CHARS,
        }
    }

    /// Limit how much document text is sent to the model
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    fn excerpt<'a>(&self, text: &'a str) -> &'a str {
        match text.char_indices().nth(self.max_chars) {
            Some((end, _)) => &text[..end],
            None => text,
        }
    }
}

#[async_trait]
impl ResearchSummarizer for LlmResearchSummarizer {
    async fn summarize(&self, document: ResearchDocument) -> Result<ResearchSummary> {
        let text = document.text.trim();
        if text.is_empty() {
            return Err(BuilderError::collaborator(
                COLLABORATOR,
                "document contains no extractable text",
            ));
        }

        let excerpt = self.excerpt(text);
        info!(
            title = %document.title,
            chars = excerpt.chars().count(),
            provider = self.provider.name(),
            "Summarizing research document"
        );

        let messages = [
            Message::system(SYSTEM_PROMPT),
            Message::user(format!("Document: {}\n\n{}", document.title, excerpt)),
        ];
        let completion = self
            .provider
            .complete(&messages, &self.options)
            .await
            .map_err(|e| {
                warn!(error = %e, "Research summary failed");
                BuilderError::collaborator(COLLABORATOR, e.user_message())
            })?;

        let summary = completion.content.trim();
        if summary.is_empty() {
            return Err(BuilderError::collaborator(COLLABORATOR, "model returned no summary"));
        }

        Ok(ResearchSummary {
            source: document.title,
            summary: summary.to_string(),
        })
    }

    fn name(&self) -> &str {
        "LlmResearchSummarizer"
    }
}
