//! Mock Sentiment Source
//!
//! For demos and tests. Returns fixed scores for any asset.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::SentimentSource;
use crate::error::{BuilderError, Result};
use crate::model::{SentimentLabel, SentimentReport, SignalDirection, TradingSignal};

/// Deterministic sentiment feed
#[derive(Clone, Debug, Default)]
pub struct MockSentimentSource {
    latency: Option<Duration>,
    failure: Option<String>,
}

impl MockSentimentSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a slow upstream
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make every fetch fail with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            latency: None,
            failure: Some(message.into()),
        }
    }

    fn report(asset: &str) -> SentimentReport {
        let score = 0.65;
        SentimentReport {
            asset: asset.to_uppercase(),
            overall_sentiment: SentimentLabel::from_score(score),
            sentiment_score: score,
            confidence: 0.78,
            category_scores: vec![
                ("Social Media".into(), 0.72),
                ("News".into(), 0.58),
                ("Technical".into(), 0.64),
            ],
            trending_keywords: ["bullish", "crypto", "adoption", "volatility", "regulation"]
                .into_iter()
                .map(String::from)
                .collect(),
            trading_signal: TradingSignal {
                signal: SignalDirection::Buy,
                strength: 65.0,
                reasoning: format!(
                    "Social and technical sentiment for {} lead news coverage",
                    asset.to_uppercase()
                ),
            },
            key_insights: vec![
                "Social media mentions trending upward".into(),
                "Technical indicators broadly positive".into(),
            ],
            risk_factors: vec![
                "Regulatory headlines can reverse sentiment quickly".into(),
                "Elevated volatility around macro events".into(),
            ],
        }
    }
}

#[async_trait]
impl SentimentSource for MockSentimentSource {
    async fn fetch(&self, asset: &str) -> Result<SentimentReport> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if let Some(message) = &self.failure {
            return Err(BuilderError::collaborator("Sentiment analysis", message.clone()));
        }
        debug!(asset, "Returning mock sentiment");
        Ok(Self::report(asset))
    }

    fn name(&self) -> &str {
        "MockSentiment"
    }
}
