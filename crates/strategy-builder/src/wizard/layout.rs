//! Step configuration
//!
//! A layout is an ordered list of steps. Step indices are positions in that
//! list, so the same `StepKind` can sit at different indices in different
//! layouts.

use serde::{Deserialize, Serialize};

/// What a wizard step collects
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Token,
    Foundational,
    Sentiment,
    Research,
    Parameters,
    RiskManagement,
    InstantSwap,
    Review,
    Generated,
}

impl StepKind {
    /// Optional inputs that may be skipped without affecting the core fields
    pub fn is_skippable(self) -> bool {
        matches!(
            self,
            StepKind::Foundational | StepKind::Sentiment | StepKind::Research
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Step {
    pub kind: StepKind,
    pub label: &'static str,
}

const fn step(kind: StepKind, label: &'static str) -> Step {
    Step { kind, label }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WizardLayout {
    pub name: &'static str,
    steps: Vec<Step>,
}

impl WizardLayout {
    /// Every optional input, nine steps
    pub fn full() -> Self {
        Self {
            name: "full",
            steps: vec![
                step(StepKind::Token, "Select Token"),
                step(StepKind::Foundational, "Foundational Strategy"),
                step(StepKind::Sentiment, "Market Sentiment"),
                step(StepKind::Research, "Research Integration"),
                step(StepKind::Parameters, "Define Parameters"),
                step(StepKind::RiskManagement, "Risk Management"),
                step(StepKind::InstantSwap, "Swap for Profit"),
                step(StepKind::Review, "Strategy String"),
                step(StepKind::Generated, "Generated Strategy"),
            ],
        }
    }

    pub fn standard() -> Self {
        Self {
            name: "standard",
            steps: vec![
                step(StepKind::Token, "Select Token"),
                step(StepKind::Sentiment, "Market Sentiment"),
                step(StepKind::Parameters, "Define Parameters"),
                step(StepKind::RiskManagement, "Risk Management"),
                step(StepKind::InstantSwap, "Swap for Profit"),
                step(StepKind::Review, "Review & Generate"),
                step(StepKind::Generated, "Generated Strategy"),
            ],
        }
    }

    /// No optional inputs
    pub fn classic() -> Self {
        Self {
            name: "classic",
            steps: vec![
                step(StepKind::Token, "Select Asset & Strategy"),
                step(StepKind::Parameters, "Define Parameters"),
                step(StepKind::RiskManagement, "Risk Management"),
                step(StepKind::InstantSwap, "Instant Swap Settings"),
                step(StepKind::Review, "Review & Generate"),
                step(StepKind::Generated, "Generated Strategy"),
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn kind_at(&self, index: usize) -> Option<StepKind> {
        self.steps.get(index).map(|s| s.kind)
    }

    pub fn index_of(&self, kind: StepKind) -> Option<usize> {
        self.steps.iter().position(|s| s.kind == kind)
    }

    pub fn is_skippable(&self, index: usize) -> bool {
        self.kind_at(index).is_some_and(StepKind::is_skippable)
    }

    pub fn last_index(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }
}

impl Default for WizardLayout {
    fn default() -> Self {
        Self::full()
    }
}

impl std::str::FromStr for WizardLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(Self::full()),
            "standard" => Ok(Self::standard()),
            "classic" => Ok(Self::classic()),
            other => Err(format!("unknown wizard layout '{}'", other)),
        }
    }
}
