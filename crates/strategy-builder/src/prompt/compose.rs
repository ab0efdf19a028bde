//! Prompt composition
//!
//! Composing is pure: identical inputs give byte-identical text and nothing
//! here touches wizard state. Missing optional data omits its section.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::catalog::FoundationalStrategy;
use crate::model::{ModelTarget, ResearchSummary, SentimentReport, StrategyParameters, TokenInfo};
use crate::wizard::{StepKind, WizardLayout};

use super::templates;

/// How emitted sections are numbered
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionNumbering {
    /// 1..n over the sections actually emitted, no gaps
    Sequential,
    /// Every section keeps its own number, so omitted sections leave gaps
    #[default]
    Stable,
}

impl std::str::FromStr for SectionNumbering {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" => Ok(SectionNumbering::Sequential),
            "stable" => Ok(SectionNumbering::Stable),
            other => Err(format!("unknown section numbering '{}'", other)),
        }
    }
}

/// Inputs that may or may not be present when composing
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AuxiliaryInputs {
    #[serde(default)]
    pub token: Option<TokenInfo>,
    #[serde(default)]
    pub foundational: Option<FoundationalStrategy>,
    #[serde(default)]
    pub sentiment: Option<SentimentReport>,
    #[serde(default)]
    pub research: Option<ResearchSummary>,
    #[serde(default)]
    pub custom_modifications: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Section {
    Asset,
    Foundational,
    Sentiment,
    Research,
    Parameters,
    Risk,
    Swap,
    Custom,
}

impl Section {
    const ORDER: [Section; 8] = [
        Section::Asset,
        Section::Foundational,
        Section::Sentiment,
        Section::Research,
        Section::Parameters,
        Section::Risk,
        Section::Swap,
        Section::Custom,
    ];

    fn title(self) -> &'static str {
        match self {
            Section::Asset => "ASSET SELECTION",
            Section::Foundational => "TRADITIONAL FINANCE STRATEGY FOUNDATION",
            Section::Sentiment => "MARKET SENTIMENT ANALYSIS",
            Section::Research => "RESEARCH INTEGRATION",
            Section::Parameters => "STRATEGY PARAMETERS",
            Section::Risk => "RISK MANAGEMENT",
            Section::Swap => "INSTANT SWAP CONFIGURATION",
            Section::Custom => "CUSTOM MODIFICATIONS",
        }
    }

    fn stable_number(self) -> usize {
        match self {
            Section::Asset => 1,
            Section::Foundational => 2,
            Section::Sentiment => 3,
            Section::Research => 4,
            Section::Parameters => 5,
            Section::Risk => 6,
            Section::Swap => 7,
            Section::Custom => 8,
        }
    }

    /// Custom text has no step of its own to skip
    fn step(self) -> Option<StepKind> {
        match self {
            Section::Asset => Some(StepKind::Token),
            Section::Foundational => Some(StepKind::Foundational),
            Section::Sentiment => Some(StepKind::Sentiment),
            Section::Research => Some(StepKind::Research),
            Section::Parameters => Some(StepKind::Parameters),
            Section::Risk => Some(StepKind::RiskManagement),
            Section::Swap => Some(StepKind::InstantSwap),
            Section::Custom => None,
        }
    }
}

/// Renders wizard inputs into the text sent to the LLM
#[derive(Clone, Copy, Debug)]
pub struct PromptComposer<'a> {
    layout: &'a WizardLayout,
    numbering: SectionNumbering,
}

impl<'a> PromptComposer<'a> {
    pub fn new(layout: &'a WizardLayout) -> Self {
        Self {
            layout,
            numbering: SectionNumbering::default(),
        }
    }

    pub fn with_numbering(mut self, numbering: SectionNumbering) -> Self {
        self.numbering = numbering;
        self
    }

    pub fn compose(
        &self,
        params: &StrategyParameters,
        skipped: &BTreeSet<usize>,
        aux: &AuxiliaryInputs,
        target: ModelTarget,
    ) -> String {
        let mut prompt = String::from(templates::preamble(target));
        let mut emitted = 0;

        for section in Section::ORDER {
            if self.is_skipped(section, skipped) {
                continue;
            }
            let Some(body) = render(section, params, aux) else {
                continue;
            };
            emitted += 1;
            let number = match self.numbering {
                SectionNumbering::Sequential => emitted,
                SectionNumbering::Stable => section.stable_number(),
            };
            prompt.push_str(&format!("\n## {}. {}\n", number, section.title()));
            prompt.push_str(&body);
        }

        prompt.push_str(templates::instruction(target));
        prompt
    }

    fn is_skipped(&self, section: Section, skipped: &BTreeSet<usize>) -> bool {
        section
            .step()
            .and_then(|kind| self.layout.index_of(kind))
            .is_some_and(|index| skipped.contains(&index))
    }
}

fn render(section: Section, params: &StrategyParameters, aux: &AuxiliaryInputs) -> Option<String> {
    match section {
        Section::Asset => aux.token.as_ref().map(render_token),
        Section::Foundational => aux.foundational.as_ref().map(render_foundational),
        Section::Sentiment => aux.sentiment.as_ref().map(render_sentiment),
        Section::Research => aux.research.as_ref().map(render_research),
        Section::Parameters => Some(render_parameters(params)),
        Section::Risk => Some(render_risk(params)),
        Section::Swap => Some(render_swap(params)),
        Section::Custom => {
            let text = &aux.custom_modifications;
            (!text.trim().is_empty()).then(|| format!("{}\n", text))
        }
    }
}

const NOT_AVAILABLE: &str = "N/A";

fn millions(value: Option<Decimal>) -> String {
    value
        .and_then(|v| v.checked_div(dec!(1_000_000)))
        .map_or_else(|| NOT_AVAILABLE.to_string(), |m| format!("${:.2}M", m))
}

fn bullets(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

fn render_token(token: &TokenInfo) -> String {
    let price = token
        .price
        .map_or_else(|| NOT_AVAILABLE.to_string(), |p| format!("${}", p));
    format!(
        "Token: {} ({})\nAddress: {}\nCategory: {}\nDescription: {}\nMarket Cap: {}\nPrice: {}\nVolume (24h): {}\n",
        token.name,
        token.symbol,
        token.address,
        token.category,
        token.description,
        millions(token.market_cap),
        price,
        millions(token.volume_24h),
    )
}

fn render_foundational(strategy: &FoundationalStrategy) -> String {
    let risk = &strategy.risk;
    format!(
        "Strategy: {}\nCategory: {}\nTraditional Asset: {}\nCrypto Adaptation: {}\nAcademic Basis: {}\nComplexity: {}\nVolatility: {}\n\
         \nKey Indicators: {}\n\
         \nEntry Rules:\n{}\n\
         \nExit Rules:\n{}\n\
         \nRisk Management:\n- Stop Loss: {}\n- Take Profit: {}\n- Position Sizing: {}\n- Max Drawdown: {}\n\
         \nAdvantages: {}\nDisadvantages: {}\n\
         \nAcademic Papers:\n{}\n",
        strategy.name,
        strategy.category,
        strategy.traditional_asset,
        strategy.crypto_adaptation,
        strategy.academic_basis,
        strategy.complexity,
        strategy.volatility,
        strategy.key_indicators.join(", "),
        bullets(&strategy.entry_rules),
        bullets(&strategy.exit_rules),
        risk.stop_loss,
        risk.take_profit,
        risk.position_sizing,
        risk.max_drawdown,
        strategy.advantages.join(", "),
        strategy.disadvantages.join(", "),
        bullets(&strategy.papers),
    )
}

fn render_sentiment(report: &SentimentReport) -> String {
    let mut body = format!(
        "Overall Sentiment: {}\nSentiment Score: {:.1}%\nConfidence: {:.1}%\n",
        report.overall_sentiment.as_str(),
        report.sentiment_score * 100.0,
        report.confidence * 100.0,
    );
    if !report.category_scores.is_empty() {
        let scores = report
            .category_scores
            .iter()
            .map(|(name, score)| format!("{} {:.1}%", name, score * 100.0))
            .collect::<Vec<_>>()
            .join(", ");
        body.push_str(&format!("Category Scores: {}\n", scores));
    }
    if !report.trending_keywords.is_empty() {
        body.push_str(&format!(
            "Trending Keywords: {}\n",
            report.trending_keywords.join(", ")
        ));
    }

    let signal = &report.trading_signal;
    body.push_str(&format!(
        "\nTrading Signal: {} ({:.0}% strength)\nReasoning: {}\n\nKey Insights:\n{}\n\nRisk Factors:\n{}\n",
        signal.signal.as_str(),
        signal.strength,
        signal.reasoning,
        bullets(&report.key_insights),
        bullets(&report.risk_factors),
    ));
    body
}

fn render_research(research: &ResearchSummary) -> String {
    format!(
        "Source: {}\nResearch Summary:\n{}\n\n{}",
        research.source,
        research.summary.trim_end(),
        templates::RESEARCH_NOTES,
    )
}

fn render_parameters(params: &StrategyParameters) -> String {
    format!(
        "Asset: {}\nStrategy Type: {}\nBreakout Condition: {}\nPercentage Increase: {}%\nTimeframe: {}\nVolume Condition: {}\n",
        params.asset,
        params.strategy_type,
        params.breakout_condition,
        params.percentage_increase,
        params.timeframe,
        params.volume_condition,
    )
}

fn render_risk(params: &StrategyParameters) -> String {
    let risk = &params.risk_management;
    let ratio = risk
        .risk_reward_ratio()
        .map_or_else(|| NOT_AVAILABLE.to_string(), |r| format!("{:.2}:1", r));
    format!(
        "Stop Loss: {}%\nTake Profit: {}%\nPosition Size: {}%\nRisk-Reward Ratio: {}\n",
        risk.stop_loss, risk.take_profit, risk.position_size, ratio,
    )
}

fn render_swap(params: &StrategyParameters) -> String {
    let swap = &params.instant_swap;
    if !swap.enabled {
        return "Enabled: No\n\n".to_string();
    }
    format!(
        "Enabled: Yes\n\nStablecoin: {}\nMinimum Profit Threshold: {}%\nAuto-Compound: {}\n\n",
        swap.stablecoin,
        swap.min_profit_threshold,
        yes_no(swap.auto_compound),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{find_foundational, find_token};
    use crate::model::{
        SentimentLabel, SignalDirection, StrategyType, Timeframe, TradingSignal,
    };

    fn btc_trend() -> StrategyParameters {
        let mut params = StrategyParameters {
            asset: "BTC".into(),
            strategy_type: StrategyType::Trend,
            percentage_increase: dec!(5),
            timeframe: Timeframe::FourHours,
            ..StrategyParameters::default()
        };
        params.risk_management.stop_loss = dec!(3);
        params.risk_management.take_profit = dec!(9);
        params
    }

    fn sentiment() -> SentimentReport {
        SentimentReport {
            asset: "SOL".into(),
            overall_sentiment: SentimentLabel::Bullish,
            sentiment_score: 0.65,
            confidence: 0.8,
            category_scores: vec![("News".into(), 0.58)],
            trending_keywords: vec!["adoption".into()],
            trading_signal: TradingSignal {
                signal: SignalDirection::Buy,
                strength: 70.0,
                reasoning: "Positive momentum".into(),
            },
            key_insights: vec!["Developer activity rising".into()],
            risk_factors: vec!["Regulatory news".into()],
        }
    }

    fn everything() -> AuxiliaryInputs {
        AuxiliaryInputs {
            token: find_token("SOL"),
            foundational: find_foundational("turtle_breakout"),
            sentiment: Some(sentiment()),
            research: Some(ResearchSummary {
                source: "whitepaper.pdf".into(),
                summary: "Throughput keeps improving.".into(),
            }),
            custom_modifications: String::new(),
        }
    }

    #[test]
    fn test_btc_scenario_without_optional_sections() {
        let layout = WizardLayout::full();
        let prompt = PromptComposer::new(&layout).compose(
            &btc_trend(),
            &BTreeSet::new(),
            &AuxiliaryInputs::default(),
            ModelTarget::Gemini,
        );

        assert!(prompt.contains("Asset: BTC"));
        assert!(prompt.contains("Stop Loss: 3%"));
        assert!(prompt.contains("Take Profit: 9%"));
        assert!(prompt.contains("Risk-Reward Ratio: 3.00:1"));
        assert!(!prompt.contains("Research Integration"));
        assert!(!prompt.contains("RESEARCH INTEGRATION"));
        assert!(!prompt.contains("Sentiment"));
        assert!(!prompt.contains("SENTIMENT"));
    }

    #[test]
    fn test_golden_default_gpt_prompt() {
        let layout = WizardLayout::full();
        let prompt = PromptComposer::new(&layout).compose(
            &StrategyParameters::default(),
            &BTreeSet::new(),
            &AuxiliaryInputs::default(),
            ModelTarget::Gpt,
        );

        let expected = "[CRYPTO TRADING STRATEGY GENERATION]

You are a professional crypto trading advisor. Create a detailed trading strategy based on the provided information.

## Strategy Context

## 5. STRATEGY PARAMETERS
Asset: SOL
Strategy Type: breakout
Breakout Condition: price_increase
Percentage Increase: 3%
Timeframe: 15m
Volume Condition: above_average

## 6. RISK MANAGEMENT
Stop Loss: 2%
Take Profit: 6%
Position Size: 100%
Risk-Reward Ratio: 3.00:1

## 7. INSTANT SWAP CONFIGURATION
Enabled: No


## INSTRUCTION
Based on the provided information, create a comprehensive trading strategy that includes:
1. Strategy overview and objectives
2. Entry and exit criteria
3. Risk management rules
4. Technical analysis framework
5. Performance monitoring plan
6. Implementation guidelines";

        assert_eq!(prompt, expected);
    }

    #[test]
    fn test_golden_default_gemini_prompt() {
        let layout = WizardLayout::full();
        let prompt = PromptComposer::new(&layout).compose(
            &StrategyParameters::default(),
            &BTreeSet::new(),
            &AuxiliaryInputs::default(),
            ModelTarget::Gemini,
        );

        let expected = "[CRYPTO TRADING STRATEGY GENERATION]

You are an expert crypto trading strategist with deep knowledge of traditional finance, technical analysis, and Solana ecosystem dynamics. Generate a comprehensive, actionable trading strategy based on the following inputs:


## 5. STRATEGY PARAMETERS
Asset: SOL
Strategy Type: breakout
Breakout Condition: price_increase
Percentage Increase: 3%
Timeframe: 15m
Volume Condition: above_average

## 6. RISK MANAGEMENT
Stop Loss: 2%
Take Profit: 6%
Position Size: 100%
Risk-Reward Ratio: 3.00:1

## 7. INSTANT SWAP CONFIGURATION
Enabled: No


## INSTRUCTION
Please analyze this comprehensive strategy configuration and provide:
1. A detailed breakdown of the strategy logic and execution plan
2. Specific entry and exit criteria with technical indicators
3. Risk management implementation details
4. Market condition analysis and adaptation strategies
5. Performance expectations and monitoring metrics
6. Implementation timeline and execution steps
7. Stablecoin swap execution strategy and liquidity considerations
8. Backtesting recommendations and historical performance analysis

Format the response as a professional trading strategy document with clear sections and actionable insights.";

        assert_eq!(prompt, expected);
    }

    #[test]
    fn test_compose_is_deterministic() {
        let layout = WizardLayout::full();
        let composer = PromptComposer::new(&layout);
        let skipped = BTreeSet::from([2]);
        let aux = everything();
        for target in [ModelTarget::Gemini, ModelTarget::Gpt, ModelTarget::Claude] {
            let a = composer.compose(&btc_trend(), &skipped, &aux, target);
            let b = composer.compose(&btc_trend(), &skipped, &aux, target);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_skipped_sections_never_rendered() {
        let layout = WizardLayout::full();
        let composer = PromptComposer::new(&layout);
        let aux = everything();

        let all = composer.compose(&btc_trend(), &BTreeSet::new(), &aux, ModelTarget::Claude);
        assert!(all.contains("TRADITIONAL FINANCE STRATEGY FOUNDATION"));
        assert!(all.contains("MARKET SENTIMENT ANALYSIS"));
        assert!(all.contains("RESEARCH INTEGRATION"));

        let skipped = BTreeSet::from([1, 2, 3]);
        let some = composer.compose(&btc_trend(), &skipped, &aux, ModelTarget::Claude);
        assert!(!some.contains("TRADITIONAL FINANCE STRATEGY FOUNDATION"));
        assert!(!some.contains("MARKET SENTIMENT ANALYSIS"));
        assert!(!some.contains("RESEARCH INTEGRATION"));
        assert!(some.contains("## 1. ASSET SELECTION"));
        assert!(some.contains("## 5. STRATEGY PARAMETERS"));

        let renumbered = composer
            .with_numbering(SectionNumbering::Sequential)
            .compose(&btc_trend(), &skipped, &aux, ModelTarget::Claude);
        assert!(renumbered.contains("## 2. STRATEGY PARAMETERS"));
    }

    #[test]
    fn test_custom_text_appears_once_verbatim() {
        let layout = WizardLayout::full();
        let composer = PromptComposer::new(&layout);
        let custom = "  Only trade during US hours.\nAvoid weekends.";
        let aux = AuxiliaryInputs {
            custom_modifications: custom.into(),
            ..everything()
        };

        for skipped in [BTreeSet::new(), BTreeSet::from([1, 2, 3]), (0..9).collect()] {
            let prompt = composer.compose(&btc_trend(), &skipped, &aux, ModelTarget::Gemini);
            assert_eq!(prompt.matches(custom).count(), 1);
            assert!(prompt.contains("CUSTOM MODIFICATIONS"));
        }

        let blank = AuxiliaryInputs {
            custom_modifications: "   ".into(),
            ..AuxiliaryInputs::default()
        };
        let prompt = composer.compose(&btc_trend(), &BTreeSet::new(), &blank, ModelTarget::Gemini);
        assert!(!prompt.contains("CUSTOM MODIFICATIONS"));
    }

    #[test]
    fn test_numbering_modes() {
        let layout = WizardLayout::full();
        let aux = AuxiliaryInputs {
            custom_modifications: "Tighten stops".into(),
            ..AuxiliaryInputs::default()
        };

        let stable = PromptComposer::new(&layout).compose(
            &btc_trend(),
            &BTreeSet::new(),
            &aux,
            ModelTarget::Gemini,
        );
        assert!(stable.contains("## 5. STRATEGY PARAMETERS"));
        assert!(stable.contains("## 6. RISK MANAGEMENT"));
        assert!(stable.contains("## 8. CUSTOM MODIFICATIONS"));

        let sequential = PromptComposer::new(&layout)
            .with_numbering(SectionNumbering::Sequential)
            .compose(&btc_trend(), &BTreeSet::new(), &aux, ModelTarget::Gemini);
        assert!(sequential.contains("## 1. STRATEGY PARAMETERS"));
        assert!(sequential.contains("## 4. CUSTOM MODIFICATIONS"));
    }

    #[test]
    fn test_token_and_sentiment_formatting() {
        let layout = WizardLayout::full();
        let prompt = PromptComposer::new(&layout).compose(
            &StrategyParameters::default(),
            &BTreeSet::new(),
            &everything(),
            ModelTarget::Gemini,
        );
        assert!(prompt.contains("Market Cap: $92500.00M"));
        assert!(prompt.contains("Sentiment Score: 65.0%"));
        assert!(prompt.contains("Confidence: 80.0%"));
        assert!(prompt.contains("Trading Signal: BUY (70% strength)"));
        assert!(prompt.contains("- Enter long on a close above the 20-period high"));

        let unknown = TokenInfo {
            market_cap: None,
            price: None,
            volume_24h: None,
            ..find_token("SOL").unwrap()
        };
        let body = render_token(&unknown);
        assert!(body.contains("Market Cap: N/A"));
        assert!(body.contains("Price: N/A"));
    }

    #[test]
    fn test_swap_details_only_when_enabled() {
        let mut params = StrategyParameters::default();
        assert_eq!(render_swap(&params), "Enabled: No\n\n");

        params.instant_swap.enabled = true;
        params.instant_swap.auto_compound = true;
        let body = render_swap(&params);
        assert!(body.starts_with("Enabled: Yes\n\nStablecoin: USDC\n"));
        assert!(body.contains("Minimum Profit Threshold: 1.5%"));
        assert!(body.contains("Auto-Compound: Yes"));
    }

    #[test]
    fn test_degenerate_ratio_does_not_panic() {
        let mut params = StrategyParameters::default();
        params.risk_management.stop_loss = Decimal::ZERO;
        assert!(render_risk(&params).contains("Risk-Reward Ratio: N/A"));
    }

    #[test]
    fn test_values_pass_through_unrounded() {
        let mut params = StrategyParameters::default();
        params.risk_management.stop_loss = dec!(2.125);
        params.percentage_increase = dec!(3.50);
        assert!(render_risk(&params).contains("Stop Loss: 2.125%"));
        assert!(render_parameters(&params).contains("Percentage Increase: 3.50%"));
    }
}
