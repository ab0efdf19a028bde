//! Domain Models
//!
//! Core data types collected by the strategy wizard.
//! Percentages use `rust_decimal` so a value is rendered exactly as entered.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Trading approach
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyType {
    Breakout,
    Trend,
    MeanReversion,
    Momentum,
}

impl StrategyType {
    pub fn as_str(self) -> &'static str {
        match self {
            StrategyType::Breakout => "breakout",
            StrategyType::Trend => "trend",
            StrategyType::MeanReversion => "mean_reversion",
            StrategyType::Momentum => "momentum",
        }
    }
}

/// What counts as a breakout
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakoutCondition {
    PriceIncrease,
    VolumeSpike,
    PatternBreakout,
}

impl BreakoutCondition {
    pub fn as_str(self) -> &'static str {
        match self {
            BreakoutCondition::PriceIncrease => "price_increase",
            BreakoutCondition::VolumeSpike => "volume_spike",
            BreakoutCondition::PatternBreakout => "pattern_breakout",
        }
    }
}

/// Candle timeframe
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "4h")]
    FourHours,
    #[serde(rename = "1d")]
    OneDay,
}

impl Timeframe {
    pub fn as_str(self) -> &'static str {
        match self {
            Timeframe::FiveMinutes => "5m",
            Timeframe::FifteenMinutes => "15m",
            Timeframe::OneHour => "1h",
            Timeframe::FourHours => "4h",
            Timeframe::OneDay => "1d",
        }
    }
}

/// Volume confirmation rule
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeCondition {
    AboveAverage,
    DoubleAverage,
    TripleAverage,
}

impl VolumeCondition {
    pub fn as_str(self) -> &'static str {
        match self {
            VolumeCondition::AboveAverage => "above_average",
            VolumeCondition::DoubleAverage => "double_average",
            VolumeCondition::TripleAverage => "triple_average",
        }
    }
}

/// Stablecoin used to lock in profits
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Stablecoin {
    Usdc,
    Usdt,
    Dai,
}

impl Stablecoin {
    pub fn as_str(self) -> &'static str {
        match self {
            Stablecoin::Usdc => "USDC",
            Stablecoin::Usdt => "USDT",
            Stablecoin::Dai => "DAI",
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl std::fmt::Display for $ty {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )+
    };
}

display_as_str!(StrategyType, BreakoutCondition, Timeframe, VolumeCondition, Stablecoin);

fn require_positive(field: &'static str, value: Decimal) -> Result<(), ValidationError> {
    if value > Decimal::ZERO {
        Ok(())
    } else {
        Err(ValidationError::NonPositive { field, value })
    }
}

/// Stop loss / take profit / sizing, all in percent
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskManagement {
    pub stop_loss: Decimal,
    pub take_profit: Decimal,
    pub position_size: Decimal,
}

impl Default for RiskManagement {
    fn default() -> Self {
        Self {
            stop_loss: dec!(2),
            take_profit: dec!(6),
            position_size: dec!(100),
        }
    }
}

impl RiskManagement {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_positive("Stop Loss", self.stop_loss)?;
        require_positive("Take Profit", self.take_profit)?;
        require_positive("Position Size", self.position_size)
    }

    /// Take profit over stop loss, `None` when stop loss is zero
    pub fn risk_reward_ratio(&self) -> Option<Decimal> {
        if self.stop_loss.is_zero() {
            return None;
        }
        self.take_profit.checked_div(self.stop_loss)
    }
}

/// Swap-to-stablecoin settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstantSwap {
    pub enabled: bool,
    pub stablecoin: Stablecoin,
    pub min_profit_threshold: Decimal,
    pub auto_compound: bool,
}

impl Default for InstantSwap {
    fn default() -> Self {
        Self {
            enabled: false,
            stablecoin: Stablecoin::Usdc,
            min_profit_threshold: dec!(1.5),
            auto_compound: false,
        }
    }
}

impl InstantSwap {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_positive("Minimum Profit Threshold", self.min_profit_threshold)
    }
}

/// Entry-condition fields of the parameters step
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreParameters {
    pub asset: String,
    pub strategy_type: StrategyType,
    pub breakout_condition: BreakoutCondition,
    pub percentage_increase: Decimal,
    pub timeframe: Timeframe,
    pub volume_condition: VolumeCondition,
}

impl CoreParameters {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.asset.trim().is_empty() {
            return Err(ValidationError::EmptyAsset);
        }
        require_positive("Percentage Increase", self.percentage_increase)
    }
}

/// The single source of truth for the non-skippable wizard fields
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyParameters {
    /// Ticker symbol (e.g., "SOL")
    pub asset: String,
    pub strategy_type: StrategyType,
    pub breakout_condition: BreakoutCondition,
    /// Percent move that triggers entry
    pub percentage_increase: Decimal,
    pub timeframe: Timeframe,
    pub volume_condition: VolumeCondition,
    pub risk_management: RiskManagement,
    pub instant_swap: InstantSwap,
}

impl Default for StrategyParameters {
    fn default() -> Self {
        Self {
            asset: "SOL".into(),
            strategy_type: StrategyType::Breakout,
            breakout_condition: BreakoutCondition::PriceIncrease,
            percentage_increase: dec!(3),
            timeframe: Timeframe::FifteenMinutes,
            volume_condition: VolumeCondition::AboveAverage,
            risk_management: RiskManagement::default(),
            instant_swap: InstantSwap::default(),
        }
    }
}

impl StrategyParameters {
    pub fn core(&self) -> CoreParameters {
        CoreParameters {
            asset: self.asset.clone(),
            strategy_type: self.strategy_type,
            breakout_condition: self.breakout_condition,
            percentage_increase: self.percentage_increase,
            timeframe: self.timeframe,
            volume_condition: self.volume_condition,
        }
    }

    /// Overwrite the entry-condition fields; the symbol is upper-cased
    pub fn set_core(&mut self, core: CoreParameters) {
        self.asset = core.asset.trim().to_uppercase();
        self.strategy_type = core.strategy_type;
        self.breakout_condition = core.breakout_condition;
        self.percentage_increase = core.percentage_increase;
        self.timeframe = core.timeframe;
        self.volume_condition = core.volume_condition;
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.core().validate()?;
        self.risk_management.validate()?;
        self.instant_swap.validate()
    }
}

/// A token picked on the first step
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub symbol: String,
    pub name: String,
    /// Mint address
    pub address: String,
    pub category: String,
    pub description: String,
    /// Market capitalization in USD
    #[serde(default)]
    pub market_cap: Option<Decimal>,
    /// Price in USD
    #[serde(default)]
    pub price: Option<Decimal>,
    /// 24h volume in USD
    #[serde(default)]
    pub volume_24h: Option<Decimal>,
}

/// Overall sentiment label
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    Bullish,
    Neutral,
    Bearish,
}

impl SentimentLabel {
    /// Classify a 0..1 score
    pub fn from_score(score: f64) -> Self {
        if score >= 0.6 {
            SentimentLabel::Bullish
        } else if score >= 0.4 {
            SentimentLabel::Neutral
        } else {
            SentimentLabel::Bearish
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SentimentLabel::Bullish => "Bullish",
            SentimentLabel::Neutral => "Neutral",
            SentimentLabel::Bearish => "Bearish",
        }
    }
}

/// Direction suggested by sentiment
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalDirection {
    Buy,
    Hold,
    Sell,
}

impl SignalDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SignalDirection::Buy => "BUY",
            SignalDirection::Hold => "HOLD",
            SignalDirection::Sell => "SELL",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TradingSignal {
    pub signal: SignalDirection,
    /// 0..100
    pub strength: f64,
    pub reasoning: String,
}

/// Result of the market sentiment step
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SentimentReport {
    pub asset: String,
    pub overall_sentiment: SentimentLabel,
    /// 0..1
    pub sentiment_score: f64,
    /// 0..1
    pub confidence: f64,
    /// Per-source category scores, 0..1
    #[serde(default)]
    pub category_scores: Vec<(String, f64)>,
    #[serde(default)]
    pub trending_keywords: Vec<String>,
    pub trading_signal: TradingSignal,
    #[serde(default)]
    pub key_insights: Vec<String>,
    #[serde(default)]
    pub risk_factors: Vec<String>,
}

/// Summary produced from an uploaded research document
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchSummary {
    /// Document title or file name
    pub source: String,
    pub summary: String,
}

/// LLM family the prompt is phrased for
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelTarget {
    #[default]
    Gemini,
    Gpt,
    Claude,
}

impl std::str::FromStr for ModelTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(ModelTarget::Gemini),
            "gpt" | "openai" => Ok(ModelTarget::Gpt),
            "claude" | "anthropic" => Ok(ModelTarget::Claude),
            other => Err(format!("unknown model target '{}'", other)),
        }
    }
}

/// Text returned by the LLM for a composed prompt
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeneratedStrategy {
    pub id: Uuid,
    pub content: String,
    pub model_target: ModelTarget,
    /// Prompt the content was generated from
    pub prompt: String,
    pub generated_at: DateTime<Utc>,
}

impl GeneratedStrategy {
    pub fn new(content: impl Into<String>, prompt: impl Into<String>, model_target: ModelTarget) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            model_target,
            prompt: prompt.into(),
            generated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_parameters() {
        let params = StrategyParameters::default();
        assert_eq!(params.asset, "SOL");
        assert_eq!(params.strategy_type, StrategyType::Breakout);
        assert_eq!(params.timeframe, Timeframe::FifteenMinutes);
        assert_eq!(params.risk_management.stop_loss, dec!(2));
        assert_eq!(params.risk_management.take_profit, dec!(6));
        assert_eq!(params.risk_management.position_size, dec!(100));
        assert!(!params.instant_swap.enabled);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_zero_and_negative_percentages_rejected() {
        let mut params = StrategyParameters::default();
        params.risk_management.stop_loss = Decimal::ZERO;
        assert_eq!(
            params.validate(),
            Err(ValidationError::NonPositive { field: "Stop Loss", value: Decimal::ZERO })
        );

        let mut params = StrategyParameters::default();
        params.percentage_increase = dec!(-3);
        assert!(matches!(
            params.validate(),
            Err(ValidationError::NonPositive { field: "Percentage Increase", .. })
        ));
    }

    #[test]
    fn test_risk_reward_ratio() {
        let risk = RiskManagement::default();
        assert_eq!(risk.risk_reward_ratio(), Some(dec!(3)));

        let degenerate = RiskManagement { stop_loss: Decimal::ZERO, ..risk };
        assert_eq!(degenerate.risk_reward_ratio(), None);
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_string(&Timeframe::FourHours).unwrap(), "\"4h\"");
        assert_eq!(serde_json::to_string(&StrategyType::MeanReversion).unwrap(), "\"mean_reversion\"");
        assert_eq!(serde_json::to_string(&Stablecoin::Usdt).unwrap(), "\"USDT\"");
        assert_eq!(Timeframe::OneDay.to_string(), "1d");
    }

    #[test]
    fn test_set_core_uppercases_symbol() {
        let mut params = StrategyParameters::default();
        let mut core = params.core();
        core.asset = " btc ".into();
        params.set_core(core);
        assert_eq!(params.asset, "BTC");
    }

    #[test]
    fn test_sentiment_label_thresholds() {
        assert_eq!(SentimentLabel::from_score(0.65), SentimentLabel::Bullish);
        assert_eq!(SentimentLabel::from_score(0.5), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_score(0.1), SentimentLabel::Bearish);
    }
}
