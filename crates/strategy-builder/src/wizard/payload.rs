use serde::{Deserialize, Serialize};

use crate::catalog::FoundationalStrategy;
use crate::model::{
    CoreParameters, InstantSwap, ResearchSummary, RiskManagement, SentimentReport, TokenInfo,
};

use super::layout::StepKind;

/// Value submitted for one wizard step
///
/// `None` on an optional step clears a previously stored value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", content = "value", rename_all = "snake_case")]
pub enum StepPayload {
    TokenSelection(TokenInfo),
    FoundationalStrategy(Option<FoundationalStrategy>),
    SentimentResult(Option<SentimentReport>),
    ResearchSummary(Option<ResearchSummary>),
    CoreParameters(CoreParameters),
    RiskSettings(RiskManagement),
    SwapSettings(InstantSwap),
    FreeText(String),
}

impl StepPayload {
    /// The step this payload belongs to
    pub fn kind(&self) -> StepKind {
        match self {
            StepPayload::TokenSelection(_) => StepKind::Token,
            StepPayload::FoundationalStrategy(_) => StepKind::Foundational,
            StepPayload::SentimentResult(_) => StepKind::Sentiment,
            StepPayload::ResearchSummary(_) => StepKind::Research,
            StepPayload::CoreParameters(_) => StepKind::Parameters,
            StepPayload::RiskSettings(_) => StepKind::RiskManagement,
            StepPayload::SwapSettings(_) => StepKind::InstantSwap,
            StepPayload::FreeText(_) => StepKind::Review,
        }
    }
}
