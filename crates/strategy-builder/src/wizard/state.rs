//! Wizard State Machine
//!
//! Owns everything a user enters while building a strategy. Steps move
//! linearly; errors are recorded in `last_error` and never lose entered data.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strategy_core::GenerationError;
use tracing::{debug, info, warn};

use crate::catalog::{find_foundational, find_preset};
use crate::collab::{ResearchDocument, ResearchSummarizer, SentimentSource};
use crate::error::{BuilderError, ErrorInfo, ErrorKind, Result, ValidationError};
use crate::generation::{GenerationTicket, StrategyLlm};
use crate::model::{GeneratedStrategy, ModelTarget, StrategyParameters};
use crate::prompt::{AuxiliaryInputs, PromptComposer, SectionNumbering};

use super::layout::{StepKind, WizardLayout};
use super::payload::StepPayload;

/// One user's strategy being built
#[derive(Clone, Debug)]
pub struct StrategyWizard {
    layout: WizardLayout,
    numbering: SectionNumbering,
    active_step: usize,
    skipped: BTreeSet<usize>,
    params: StrategyParameters,
    aux: AuxiliaryInputs,
    selected_preset: Option<String>,
    model_target: ModelTarget,
    generation_result: Option<GeneratedStrategy>,
    last_error: Option<ErrorInfo>,
    busy: bool,
    attempts: u64,
    pending_attempt: Option<u64>,
}

impl Default for StrategyWizard {
    fn default() -> Self {
        Self::new(WizardLayout::default())
    }
}

impl StrategyWizard {
    pub fn new(layout: WizardLayout) -> Self {
        Self {
            layout,
            numbering: SectionNumbering::default(),
            active_step: 0,
            skipped: BTreeSet::new(),
            params: StrategyParameters::default(),
            aux: AuxiliaryInputs::default(),
            selected_preset: None,
            model_target: ModelTarget::default(),
            generation_result: None,
            last_error: None,
            busy: false,
            attempts: 0,
            pending_attempt: None,
        }
    }

    pub fn with_numbering(mut self, numbering: SectionNumbering) -> Self {
        self.numbering = numbering;
        self
    }

    // ----- accessors -----

    pub fn layout(&self) -> &WizardLayout {
        &self.layout
    }

    pub fn active_step(&self) -> usize {
        self.active_step
    }

    pub fn current_step(&self) -> Option<StepKind> {
        self.layout.kind_at(self.active_step)
    }

    pub fn skipped_steps(&self) -> &BTreeSet<usize> {
        &self.skipped
    }

    pub fn parameters(&self) -> &StrategyParameters {
        &self.params
    }

    pub fn auxiliary(&self) -> &AuxiliaryInputs {
        &self.aux
    }

    pub fn selected_preset(&self) -> Option<&str> {
        self.selected_preset.as_deref()
    }

    pub fn model_target(&self) -> ModelTarget {
        self.model_target
    }

    pub fn generation_result(&self) -> Option<&GeneratedStrategy> {
        self.generation_result.as_ref()
    }

    pub fn last_error(&self) -> Option<&ErrorInfo> {
        self.last_error.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    // ----- transitions -----

    /// Advance one step. `Ok(false)` on the last step.
    pub fn next(&mut self) -> Result<bool> {
        self.ensure_idle()?;
        if self.active_step >= self.layout.last_index() {
            return Ok(false);
        }
        self.check_can_leave()?;
        self.active_step += 1;
        self.clear_validation_error();
        debug!(step = self.active_step, "Wizard advanced");
        Ok(true)
    }

    /// Go back one step. `Ok(false)` on the first step. Nothing is discarded.
    pub fn back(&mut self) -> Result<bool> {
        self.ensure_idle()?;
        if self.active_step == 0 {
            return Ok(false);
        }
        self.active_step -= 1;
        self.clear_validation_error();
        debug!(step = self.active_step, "Wizard went back");
        Ok(true)
    }

    /// Mark an optional step as skipped, then advance
    pub fn skip(&mut self, index: usize) -> Result<bool> {
        self.ensure_idle()?;
        if index >= self.layout.len() {
            return Err(self.fail(BuilderError::StepOutOfRange {
                index,
                len: self.layout.len(),
            }));
        }
        if !self.layout.is_skippable(index) {
            return Err(self.fail(BuilderError::NotSkippable(index)));
        }
        if self.active_step < self.layout.last_index() {
            self.check_can_leave()?;
        }
        self.skipped.insert(index);
        debug!(step = index, "Step skipped");
        self.next()
    }

    /// Include a skipped step again. The active step does not move.
    pub fn unskip(&mut self, index: usize) -> bool {
        let removed = self.skipped.remove(&index);
        if removed {
            debug!(step = index, "Step unskipped");
        }
        removed
    }

    /// Start over with default parameters. A pending generation is abandoned.
    pub fn reset(&mut self) {
        if self.busy {
            info!(attempt = ?self.pending_attempt, "Abandoning pending generation");
        }
        self.active_step = 0;
        self.skipped.clear();
        self.params = StrategyParameters::default();
        self.aux = AuxiliaryInputs::default();
        self.selected_preset = None;
        self.model_target = ModelTarget::default();
        self.generation_result = None;
        self.last_error = None;
        self.busy = false;
        self.pending_attempt = None;
        debug!("Wizard reset");
    }

    // ----- data entry -----

    /// Store the value for one step
    ///
    /// Invalid values are rejected with the wizard left as it was.
    pub fn apply(&mut self, payload: StepPayload) -> Result<()> {
        let kind = payload.kind();
        if self.layout.index_of(kind).is_none() {
            return Err(self.fail(BuilderError::StepNotInLayout(kind)));
        }

        match payload {
            StepPayload::TokenSelection(token) => {
                let symbol = token.symbol.trim().to_uppercase();
                if symbol.is_empty() {
                    return Err(self.fail(ValidationError::EmptyAsset.into()));
                }
                self.change_asset(symbol);
                self.aux.token = Some(token);
            }
            StepPayload::FoundationalStrategy(strategy) => self.aux.foundational = strategy,
            StepPayload::SentimentResult(report) => self.aux.sentiment = report,
            StepPayload::ResearchSummary(summary) => self.aux.research = summary,
            StepPayload::CoreParameters(core) => {
                if let Err(e) = core.validate() {
                    return Err(self.fail(e.into()));
                }
                self.change_asset(core.asset.trim().to_uppercase());
                self.params.set_core(core);
            }
            StepPayload::RiskSettings(risk) => {
                if let Err(e) = risk.validate() {
                    return Err(self.fail(e.into()));
                }
                self.params.risk_management = risk;
            }
            StepPayload::SwapSettings(swap) => {
                if let Err(e) = swap.validate() {
                    return Err(self.fail(e.into()));
                }
                self.params.instant_swap = swap;
            }
            StepPayload::FreeText(text) => self.aux.custom_modifications = text,
        }

        self.clear_validation_error();
        debug!(step = ?kind, "Step value applied");
        Ok(())
    }

    /// Replace every parameter with a proven preset
    pub fn select_preset(&mut self, id: &str) -> Result<()> {
        let Some(preset) = find_preset(id) else {
            return Err(self.fail(BuilderError::UnknownPreset(id.to_string())));
        };
        self.drop_mismatched_token(&preset.parameters.asset);
        self.params = preset.parameters;
        self.selected_preset = Some(preset.id.to_string());
        self.clear_validation_error();
        info!(preset = preset.id, "Preset selected");
        Ok(())
    }

    /// Pick a foundational strategy from the catalog
    pub fn select_foundational(&mut self, id: &str) -> Result<()> {
        let Some(strategy) = find_foundational(id) else {
            return Err(self.fail(BuilderError::UnknownStrategy(id.to_string())));
        };
        self.apply(StepPayload::FoundationalStrategy(Some(strategy)))
    }

    pub fn set_model_target(&mut self, target: ModelTarget) {
        self.model_target = target;
    }

    /// Fetch sentiment for the current asset and store it
    pub async fn load_sentiment(&mut self, source: &dyn SentimentSource) -> Result<()> {
        if self.layout.index_of(StepKind::Sentiment).is_none() {
            return Err(self.fail(BuilderError::StepNotInLayout(StepKind::Sentiment)));
        }
        match source.fetch(&self.params.asset).await {
            Ok(report) => self.apply(StepPayload::SentimentResult(Some(report))),
            Err(e) => {
                warn!(source = source.name(), error = %e, "Sentiment fetch failed");
                Err(self.fail(e))
            }
        }
    }

    /// Summarize a research document and store the summary
    pub async fn load_research(
        &mut self,
        summarizer: &dyn ResearchSummarizer,
        document: ResearchDocument,
    ) -> Result<()> {
        if self.layout.index_of(StepKind::Research).is_none() {
            return Err(self.fail(BuilderError::StepNotInLayout(StepKind::Research)));
        }
        match summarizer.summarize(document).await {
            Ok(summary) => self.apply(StepPayload::ResearchSummary(Some(summary))),
            Err(e) => {
                warn!(summarizer = summarizer.name(), error = %e, "Research summary failed");
                Err(self.fail(e))
            }
        }
    }

    /// Prompt for the current inputs; does not change the wizard
    pub fn compose_prompt(&self) -> String {
        PromptComposer::new(&self.layout)
            .with_numbering(self.numbering)
            .compose(&self.params, &self.skipped, &self.aux, self.model_target)
    }

    // ----- generation -----

    /// Start a generation attempt and mark the wizard busy
    pub fn begin_generation(&mut self) -> Result<GenerationTicket> {
        self.ensure_idle()?;
        self.attempts += 1;
        self.busy = true;
        self.pending_attempt = Some(self.attempts);
        self.last_error = None;

        let ticket = GenerationTicket {
            attempt: self.attempts,
            prompt: self.compose_prompt(),
            model_target: self.model_target,
        };
        info!(attempt = ticket.attempt, target = ?ticket.model_target, "Generation started");
        Ok(ticket)
    }

    /// Record the outcome of an attempt started with `begin_generation`
    ///
    /// On success the wizard moves to the generated step. On failure the
    /// step and all entered data stay as they were. Outcomes for abandoned
    /// attempts are dropped.
    pub fn complete_generation(
        &mut self,
        ticket: GenerationTicket,
        outcome: std::result::Result<String, GenerationError>,
    ) -> Result<()> {
        if self.pending_attempt != Some(ticket.attempt) {
            debug!(attempt = ticket.attempt, "Ignoring outcome of abandoned generation");
            return Ok(());
        }
        self.busy = false;
        self.pending_attempt = None;

        let content = outcome.and_then(|text| {
            if text.trim().is_empty() {
                Err(GenerationError::EmptyResponse)
            } else {
                Ok(text)
            }
        });

        match content {
            Ok(text) => {
                self.generation_result = Some(GeneratedStrategy::new(
                    text,
                    ticket.prompt,
                    ticket.model_target,
                ));
                self.last_error = None;
                let terminal = self
                    .layout
                    .index_of(StepKind::Generated)
                    .unwrap_or_else(|| self.layout.last_index());
                self.active_step = terminal;
                info!(attempt = ticket.attempt, "Generation finished");
                Ok(())
            }
            Err(e) => {
                warn!(attempt = ticket.attempt, error = %e, "Generation failed");
                self.generation_result = None;
                Err(self.fail(e.into()))
            }
        }
    }

    /// Compose, call the LLM and record the outcome
    pub async fn generate(&mut self, llm: &dyn StrategyLlm) -> Result<()> {
        let ticket = self.begin_generation()?;
        let outcome = llm.generate(&ticket.prompt).await;
        self.complete_generation(ticket, outcome)
    }

    /// Whether the hand-off to backtesting is available
    pub fn can_proceed(&self) -> bool {
        !self.busy && self.generation_result.is_some()
    }

    /// The generated strategy to hand off to backtesting
    pub fn proceed(&self) -> Result<&GeneratedStrategy> {
        if self.busy {
            return Err(BuilderError::Busy);
        }
        self.generation_result
            .as_ref()
            .ok_or(BuilderError::NothingGenerated)
    }

    /// Serializable snapshot for the UI
    pub fn view(&self) -> WizardView {
        let steps = self
            .layout
            .steps()
            .iter()
            .enumerate()
            .map(|(index, step)| StepView {
                index,
                kind: step.kind,
                label: step.label.to_string(),
                skippable: step.kind.is_skippable(),
                skipped: self.skipped.contains(&index),
            })
            .collect();

        WizardView {
            layout: self.layout.name.to_string(),
            steps,
            active_step: self.active_step,
            skipped_steps: self.skipped.iter().copied().collect(),
            parameters: self.params.clone(),
            auxiliary: self.aux.clone(),
            selected_preset: self.selected_preset.clone(),
            model_target: self.model_target,
            numbering: self.numbering,
            prompt: self.compose_prompt(),
            generation_result: self.generation_result.clone(),
            last_error: self.last_error.clone(),
            busy: self.busy,
            can_go_back: !self.busy && self.active_step > 0,
            can_go_next: !self.busy && self.active_step < self.layout.last_index(),
            can_proceed: self.can_proceed(),
        }
    }

    // ----- helpers -----

    fn ensure_idle(&self) -> Result<()> {
        if self.busy {
            Err(BuilderError::Busy)
        } else {
            Ok(())
        }
    }

    /// Parameter-entry steps must hold valid values before the wizard leaves them
    fn check_can_leave(&mut self) -> Result<()> {
        let checked = match self.current_step() {
            Some(StepKind::Parameters) => self.params.core().validate(),
            Some(StepKind::RiskManagement) => self.params.risk_management.validate(),
            Some(StepKind::InstantSwap) => self.params.instant_swap.validate(),
            _ => Ok(()),
        };
        checked.map_err(|e| self.fail(e.into()))
    }

    fn change_asset(&mut self, symbol: String) {
        if symbol != self.params.asset {
            self.selected_preset = None;
            self.drop_mismatched_token(&symbol);
            self.params.asset = symbol;
        }
    }

    fn drop_mismatched_token(&mut self, asset: &str) {
        if self
            .aux
            .token
            .as_ref()
            .is_some_and(|t| !t.symbol.eq_ignore_ascii_case(asset))
        {
            self.aux.token = None;
        }
    }

    fn clear_validation_error(&mut self) {
        if self
            .last_error
            .as_ref()
            .is_some_and(|e| e.kind == ErrorKind::Validation)
        {
            self.last_error = None;
        }
    }

    fn fail(&mut self, err: BuilderError) -> BuilderError {
        debug!(error = %err, "Recording wizard error");
        self.last_error = Some(ErrorInfo::from(&err));
        err
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StepView {
    pub index: usize,
    pub kind: StepKind,
    pub label: String,
    pub skippable: bool,
    pub skipped: bool,
}

/// Everything the UI needs to render a wizard
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WizardView {
    pub layout: String,
    pub steps: Vec<StepView>,
    pub active_step: usize,
    pub skipped_steps: Vec<usize>,
    pub parameters: StrategyParameters,
    pub auxiliary: AuxiliaryInputs,
    pub selected_preset: Option<String>,
    pub model_target: ModelTarget,
    pub numbering: SectionNumbering,
    pub prompt: String,
    pub generation_result: Option<GeneratedStrategy>,
    pub last_error: Option<ErrorInfo>,
    pub busy: bool,
    pub can_go_back: bool,
    pub can_go_next: bool,
    pub can_proceed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{find_token, proven_presets};
    use crate::collab::MockSentimentSource;
    use crate::model::{InstantSwap, RiskManagement, StrategyType, Timeframe};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    struct FixedLlm(std::result::Result<&'static str, &'static str>);

    #[async_trait::async_trait]
    impl StrategyLlm for FixedLlm {
        async fn generate(&self, _prompt: &str) -> std::result::Result<String, GenerationError> {
            match self.0 {
                Ok(text) => Ok(text.to_string()),
                Err(msg) => Err(GenerationError::Transport(msg.to_string())),
            }
        }
    }

    fn layouts() -> [WizardLayout; 3] {
        [
            WizardLayout::full(),
            WizardLayout::standard(),
            WizardLayout::classic(),
        ]
    }

    fn at_review() -> StrategyWizard {
        let mut wizard = StrategyWizard::new(WizardLayout::full());
        for _ in 0..7 {
            assert!(wizard.next().unwrap());
        }
        assert_eq!(wizard.current_step(), Some(StepKind::Review));
        wizard
    }

    #[test]
    fn test_next_and_back_are_bounded() {
        for layout in layouts() {
            let n = layout.len();
            let mut wizard = StrategyWizard::new(layout);

            assert!(!wizard.back().unwrap());
            assert_eq!(wizard.active_step(), 0);

            for _ in 0..n - 1 {
                assert!(wizard.next().unwrap());
            }
            assert_eq!(wizard.active_step(), n - 1);
            assert!(!wizard.next().unwrap());
            assert_eq!(wizard.active_step(), n - 1);
        }
    }

    #[test]
    fn test_back_keeps_entered_values() {
        let mut wizard = StrategyWizard::default();
        wizard.next().unwrap();
        wizard
            .apply(StepPayload::FreeText("Only trade weekdays".into()))
            .unwrap();
        wizard.back().unwrap();
        assert_eq!(wizard.auxiliary().custom_modifications, "Only trade weekdays");
    }

    #[test]
    fn test_skip_then_unskip_round_trip() {
        let mut wizard = StrategyWizard::default();
        wizard.next().unwrap();
        let before = wizard.skipped_steps().clone();

        assert!(wizard.skip(1).unwrap());
        assert_eq!(wizard.active_step(), 2);
        assert!(wizard.skipped_steps().contains(&1));

        assert!(wizard.unskip(1));
        assert_eq!(wizard.skipped_steps(), &before);
        assert_eq!(wizard.active_step(), 2);
        assert!(!wizard.unskip(1));
    }

    #[test]
    fn test_skip_rejects_required_steps() {
        let mut wizard = StrategyWizard::default();
        assert!(matches!(wizard.skip(4), Err(BuilderError::NotSkippable(4))));
        assert!(matches!(
            wizard.skip(99),
            Err(BuilderError::StepOutOfRange { index: 99, len: 9 })
        ));
        assert!(wizard.skipped_steps().is_empty());
        assert_eq!(wizard.active_step(), 0);
        assert_eq!(wizard.last_error().unwrap().kind, ErrorKind::Wizard);
    }

    #[test]
    fn test_skipped_section_leaves_prompt() {
        let mut wizard = StrategyWizard::default();
        wizard.select_foundational("turtle_breakout").unwrap();
        assert!(wizard.compose_prompt().contains("Turtle Trading Breakout"));

        wizard.next().unwrap();
        wizard.skip(1).unwrap();
        assert!(!wizard.compose_prompt().contains("Turtle Trading Breakout"));

        wizard.unskip(1);
        assert!(wizard.compose_prompt().contains("Turtle Trading Breakout"));
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut wizard = at_review();
        wizard.skip(3).ok();
        wizard.select_preset("btc_trend_v1").unwrap();
        wizard.set_model_target(ModelTarget::Claude);
        wizard
            .apply(StepPayload::TokenSelection(find_token("JUP").unwrap()))
            .unwrap();

        wizard.reset();

        let params = wizard.parameters();
        assert_eq!(params.asset, "SOL");
        assert_eq!(params.strategy_type, StrategyType::Breakout);
        assert_eq!(params.timeframe, Timeframe::FifteenMinutes);
        assert_eq!(params.risk_management.stop_loss, dec!(2));
        assert_eq!(params.risk_management.take_profit, dec!(6));
        assert_eq!(params.risk_management.position_size, dec!(100));
        assert!(!params.instant_swap.enabled);
        assert_eq!(wizard.active_step(), 0);
        assert!(wizard.skipped_steps().is_empty());
        assert!(wizard.generation_result().is_none());
        assert!(wizard.last_error().is_none());
        assert!(wizard.selected_preset().is_none());
        assert_eq!(wizard.model_target(), ModelTarget::Gemini);
    }

    #[test]
    fn test_invalid_risk_rejected_and_state_untouched() {
        let mut wizard = StrategyWizard::default();
        let result = wizard.apply(StepPayload::RiskSettings(RiskManagement {
            stop_loss: Decimal::ZERO,
            take_profit: dec!(6),
            position_size: dec!(100),
        }));

        assert!(matches!(result, Err(BuilderError::Validation(_))));
        assert_eq!(wizard.parameters().risk_management, RiskManagement::default());
        let error = wizard.last_error().unwrap();
        assert_eq!(error.kind, ErrorKind::Validation);
        assert!(error.message.contains("Stop Loss"));

        wizard
            .apply(StepPayload::RiskSettings(RiskManagement::default()))
            .unwrap();
        assert!(wizard.last_error().is_none());
    }

    #[test]
    fn test_next_refuses_to_leave_invalid_parameter_step() {
        let mut wizard = StrategyWizard::default();
        for _ in 0..5 {
            wizard.next().unwrap();
        }
        assert_eq!(wizard.current_step(), Some(StepKind::RiskManagement));

        wizard.params.risk_management.stop_loss = dec!(-2);
        assert!(matches!(wizard.next(), Err(BuilderError::Validation(_))));
        assert!(matches!(wizard.skip(3), Err(BuilderError::Validation(_))));
        assert_eq!(wizard.current_step(), Some(StepKind::RiskManagement));
        assert_eq!(wizard.last_error().unwrap().kind, ErrorKind::Validation);

        wizard.params.risk_management.stop_loss = dec!(2);
        assert!(wizard.next().unwrap());
        assert_eq!(wizard.current_step(), Some(StepKind::InstantSwap));
        assert!(wizard.last_error().is_none());

        wizard.back().unwrap();
        wizard.back().unwrap();
        wizard.params.asset = "  ".into();
        assert!(matches!(wizard.next(), Err(BuilderError::Validation(_))));
        assert_eq!(wizard.current_step(), Some(StepKind::Parameters));
    }

    #[test]
    fn test_every_preset_passes_parameter_steps() {
        for preset in proven_presets() {
            let mut wizard = StrategyWizard::default();
            for _ in 0..4 {
                wizard.next().unwrap();
            }
            wizard.select_preset(preset.id).unwrap();
            for _ in 0..3 {
                assert!(wizard.next().unwrap(), "preset {}", preset.id);
            }
            assert_eq!(wizard.current_step(), Some(StepKind::Review));
        }
    }

    #[test]
    fn test_negative_swap_threshold_rejected() {
        let mut wizard = StrategyWizard::default();
        let swap = InstantSwap {
            enabled: true,
            min_profit_threshold: dec!(-1),
            ..InstantSwap::default()
        };
        assert!(wizard.apply(StepPayload::SwapSettings(swap)).is_err());
        assert!(!wizard.parameters().instant_swap.enabled);
    }

    #[test]
    fn test_payload_for_missing_step() {
        let mut wizard = StrategyWizard::new(WizardLayout::classic());
        let result = wizard.apply(StepPayload::SentimentResult(None));
        assert!(matches!(
            result,
            Err(BuilderError::StepNotInLayout(StepKind::Sentiment))
        ));
    }

    #[test]
    fn test_token_selection_sets_asset_and_clears_preset() {
        let mut wizard = StrategyWizard::default();
        wizard.select_preset("sol_momentum_v1").unwrap();
        assert_eq!(wizard.selected_preset(), Some("sol_momentum_v1"));

        // Same asset keeps the preset
        wizard
            .apply(StepPayload::TokenSelection(find_token("SOL").unwrap()))
            .unwrap();
        assert_eq!(wizard.selected_preset(), Some("sol_momentum_v1"));

        wizard
            .apply(StepPayload::TokenSelection(find_token("JUP").unwrap()))
            .unwrap();
        assert_eq!(wizard.parameters().asset, "JUP");
        assert!(wizard.selected_preset().is_none());
        assert_eq!(wizard.parameters().strategy_type, StrategyType::Momentum);
    }

    #[test]
    fn test_preset_for_other_asset_drops_token() {
        let mut wizard = StrategyWizard::default();
        wizard
            .apply(StepPayload::TokenSelection(find_token("SOL").unwrap()))
            .unwrap();
        wizard.select_preset("eth_mean_rev_v1").unwrap();
        assert_eq!(wizard.parameters().asset, "ETH");
        assert!(wizard.auxiliary().token.is_none());
        assert!(matches!(
            wizard.select_preset("nope"),
            Err(BuilderError::UnknownPreset(_))
        ));
    }

    #[tokio::test]
    async fn test_generation_network_error_keeps_state() {
        let mut wizard = at_review();
        let step = wizard.active_step();

        let result = wizard.generate(&FixedLlm(Err("connection reset by peer"))).await;

        assert!(matches!(result, Err(BuilderError::Generation(_))));
        assert!(wizard.generation_result().is_none());
        assert_eq!(wizard.active_step(), step);
        assert!(!wizard.is_busy());
        let error = wizard.last_error().unwrap();
        assert_eq!(error.kind, ErrorKind::Generation);
        assert!(!error.message.is_empty());
        assert!(!wizard.can_proceed());
        assert!(matches!(wizard.proceed(), Err(BuilderError::NothingGenerated)));
    }

    #[tokio::test]
    async fn test_generation_success_unlocks_proceed() {
        let mut wizard = at_review();
        wizard.generate(&FixedLlm(Ok("Enter on 4h breakouts"))).await.unwrap();

        assert_eq!(wizard.current_step(), Some(StepKind::Generated));
        assert!(wizard.last_error().is_none());
        assert!(wizard.can_proceed());
        let strategy = wizard.proceed().unwrap();
        assert_eq!(strategy.content, "Enter on 4h breakouts");
        assert!(strategy.prompt.contains("Asset: SOL"));
    }

    #[tokio::test]
    async fn test_retry_after_failure() {
        let mut wizard = at_review();
        assert!(wizard.generate(&FixedLlm(Err("timeout"))).await.is_err());
        wizard.generate(&FixedLlm(Ok("Strategy"))).await.unwrap();
        assert!(wizard.last_error().is_none());
        assert!(wizard.generation_result().is_some());
    }

    #[test]
    fn test_busy_blocks_transitions() {
        let mut wizard = at_review();
        let ticket = wizard.begin_generation().unwrap();

        assert!(wizard.is_busy());
        assert!(matches!(wizard.next(), Err(BuilderError::Busy)));
        assert!(matches!(wizard.back(), Err(BuilderError::Busy)));
        assert!(matches!(wizard.skip(1), Err(BuilderError::Busy)));
        assert!(matches!(wizard.begin_generation(), Err(BuilderError::Busy)));
        assert!(!wizard.view().can_go_next);

        wizard
            .complete_generation(ticket, Err(GenerationError::EmptyResponse))
            .unwrap_err();
        assert!(!wizard.is_busy());
        assert!(wizard.next().is_ok());
    }

    #[test]
    fn test_abandoned_ticket_is_ignored() {
        let mut wizard = at_review();
        let ticket = wizard.begin_generation().unwrap();
        wizard.reset();

        wizard.complete_generation(ticket, Ok("late".into())).unwrap();
        assert!(wizard.generation_result().is_none());
        assert_eq!(wizard.active_step(), 0);
        assert!(!wizard.is_busy());
    }

    #[test]
    fn test_empty_outcome_is_an_error() {
        let mut wizard = at_review();
        let ticket = wizard.begin_generation().unwrap();
        let result = wizard.complete_generation(ticket, Ok("   ".into()));
        assert!(matches!(
            result,
            Err(BuilderError::Generation(GenerationError::EmptyResponse))
        ));
        assert!(wizard.generation_result().is_none());
    }

    #[tokio::test]
    async fn test_sentiment_failure_recorded() {
        let mut wizard = StrategyWizard::default();
        let result = wizard
            .load_sentiment(&MockSentimentSource::failing("feed offline"))
            .await;
        assert!(result.is_err());
        assert!(wizard.auxiliary().sentiment.is_none());
        assert_eq!(wizard.last_error().unwrap().kind, ErrorKind::CollaboratorFetch);

        wizard.load_sentiment(&MockSentimentSource::new()).await.unwrap();
        assert!(wizard.compose_prompt().contains("MARKET SENTIMENT ANALYSIS"));
    }

    #[test]
    fn test_view_reflects_state() {
        let mut wizard = StrategyWizard::new(WizardLayout::standard());
        wizard.next().unwrap();
        wizard.skip(1).unwrap();

        let view = wizard.view();
        assert_eq!(view.layout, "standard");
        assert_eq!(view.steps.len(), 7);
        assert_eq!(view.active_step, 2);
        assert_eq!(view.skipped_steps, vec![1]);
        assert!(view.steps[1].skipped);
        assert!(view.can_go_back);
        assert!(!view.can_proceed);
        assert!(!view.prompt.contains("MARKET SENTIMENT ANALYSIS"));
    }
}
