//! External Collaborators
//!
//! Sources for the optional wizard inputs. Each one either returns a
//! structured payload or fails with `BuilderError::CollaboratorFetch`.

mod research;
mod sentiment;

pub use research::{LlmResearchSummarizer, ResearchDocument};
pub use sentiment::MockSentimentSource;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{ResearchSummary, SentimentReport};

/// Market sentiment provider (Strategy pattern)
///
/// Implement this for each sentiment feed: social, news aggregators, etc.
#[async_trait]
pub trait SentimentSource: Send + Sync {
    /// Sentiment for an asset symbol
    async fn fetch(&self, asset: &str) -> Result<SentimentReport>;

    /// Source name
    fn name(&self) -> &str;
}

/// Turns an uploaded research document into a summary
#[async_trait]
pub trait ResearchSummarizer: Send + Sync {
    async fn summarize(&self, document: ResearchDocument) -> Result<ResearchSummary>;

    fn name(&self) -> &str;
}
