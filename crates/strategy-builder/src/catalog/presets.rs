//! Proven parameter presets

use rust_decimal_macros::dec;
use serde::Serialize;

use crate::model::{
    BreakoutCondition, InstantSwap, RiskManagement, StrategyParameters, StrategyType, Timeframe,
    VolumeCondition,
};

/// A named, known-good starting point that replaces every parameter
#[derive(Clone, Debug, Serialize)]
pub struct ProvenPreset {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: StrategyParameters,
}

fn preset(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    parameters: StrategyParameters,
) -> ProvenPreset {
    ProvenPreset { id, name, description, parameters }
}

pub fn proven_presets() -> Vec<ProvenPreset> {
    vec![
        preset(
            "sol_breakout_v1",
            "Solana Breakout V1",
            "A proven breakout strategy optimized for Solana's volatility patterns. Uses volume confirmation and dynamic stop-loss.",
            StrategyParameters::default(),
        ),
        preset(
            "sol_momentum_v1",
            "Solana Momentum V1",
            "Momentum-based strategy that capitalizes on Solana's rapid price movements. Uses RSI and MACD for timing.",
            StrategyParameters {
                strategy_type: StrategyType::Momentum,
                percentage_increase: dec!(5),
                risk_management: RiskManagement {
                    stop_loss: dec!(3),
                    take_profit: dec!(9),
                    position_size: dec!(80),
                },
                ..StrategyParameters::default()
            },
        ),
        preset(
            "btc_trend_v1",
            "Bitcoin Trend Following V1",
            "A trend-following strategy designed for Bitcoin's longer-term movements. Incorporates moving averages and volume analysis.",
            StrategyParameters {
                asset: "BTC".into(),
                strategy_type: StrategyType::Trend,
                breakout_condition: BreakoutCondition::PriceIncrease,
                percentage_increase: dec!(5),
                timeframe: Timeframe::FourHours,
                volume_condition: VolumeCondition::DoubleAverage,
                risk_management: RiskManagement {
                    stop_loss: dec!(3),
                    take_profit: dec!(9),
                    position_size: dec!(80),
                },
                instant_swap: InstantSwap::default(),
            },
        ),
        preset(
            "eth_mean_rev_v1",
            "Ethereum Mean Reversion V1",
            "A mean reversion strategy optimized for Ethereum's price patterns. Uses RSI and Bollinger Bands for entry/exit signals.",
            StrategyParameters {
                asset: "ETH".into(),
                strategy_type: StrategyType::MeanReversion,
                breakout_condition: BreakoutCondition::PatternBreakout,
                percentage_increase: dec!(2),
                timeframe: Timeframe::OneHour,
                volume_condition: VolumeCondition::TripleAverage,
                risk_management: RiskManagement {
                    stop_loss: dec!(1.5),
                    take_profit: dec!(4.5),
                    position_size: dec!(120),
                },
                instant_swap: InstantSwap::default(),
            },
        ),
    ]
}

pub fn find_preset(id: &str) -> Option<ProvenPreset> {
    proven_presets().into_iter().find(|p| p.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        for preset in proven_presets() {
            assert!(preset.parameters.validate().is_ok(), "{} invalid", preset.id);
        }
    }

    #[test]
    fn test_find_preset() {
        let btc = find_preset("btc_trend_v1").unwrap();
        assert_eq!(btc.parameters.asset, "BTC");
        assert_eq!(btc.parameters.timeframe, Timeframe::FourHours);
        assert!(find_preset("nope").is_none());
    }
}
