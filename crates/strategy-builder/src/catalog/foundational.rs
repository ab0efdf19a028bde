//! Traditional-finance strategies adapted to crypto

use serde::{Deserialize, Serialize};

/// Risk guidance carried by a foundational strategy, as prose
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyRisk {
    pub stop_loss: String,
    pub take_profit: String,
    pub position_sizing: String,
    pub max_drawdown: String,
}

/// A canned strategy template selectable as a starting point
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoundationalStrategy {
    pub id: String,
    pub name: String,
    pub category: String,
    pub traditional_asset: String,
    pub crypto_adaptation: String,
    pub academic_basis: String,
    pub complexity: String,
    pub volatility: String,
    pub key_indicators: Vec<String>,
    pub entry_rules: Vec<String>,
    pub exit_rules: Vec<String>,
    pub risk: StrategyRisk,
    pub advantages: Vec<String>,
    pub disadvantages: Vec<String>,
    pub papers: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

pub fn foundational_strategies() -> Vec<FoundationalStrategy> {
    vec![
        FoundationalStrategy {
            id: "turtle_breakout".into(),
            name: "Turtle Trading Breakout".into(),
            category: "Trend Following".into(),
            traditional_asset: "Commodity futures".into(),
            crypto_adaptation: "Donchian channel breakouts on liquid spot pairs with ATR-based sizing".into(),
            academic_basis: "Time-series momentum across asset classes".into(),
            complexity: "Intermediate".into(),
            volatility: "High".into(),
            key_indicators: strings(&["Donchian Channel (20/55)", "ATR (20)"]),
            entry_rules: strings(&[
                "Enter long on a close above the 20-period high",
                "Add units every 0.5 ATR in profit, up to 4 units",
            ]),
            exit_rules: strings(&[
                "Exit on a close below the 10-period low",
                "Exit all units if the 2 ATR stop is hit",
            ]),
            risk: StrategyRisk {
                stop_loss: "2 ATR below entry".into(),
                take_profit: "Trailing 10-period low".into(),
                position_sizing: "1% of equity per ATR unit".into(),
                max_drawdown: "25%".into(),
            },
            advantages: strings(&["Captures large trends", "Fully rule based"]),
            disadvantages: strings(&["Frequent whipsaws in ranges", "Low win rate"]),
            papers: strings(&["Moskowitz, Ooi & Pedersen (2012) - Time Series Momentum"]),
        },
        FoundationalStrategy {
            id: "bollinger_mean_reversion".into(),
            name: "Bollinger Band Mean Reversion".into(),
            category: "Mean Reversion".into(),
            traditional_asset: "Large-cap equities".into(),
            crypto_adaptation: "Fade 2σ band excursions on majors during low-trend regimes".into(),
            academic_basis: "Short-horizon return reversal".into(),
            complexity: "Beginner".into(),
            volatility: "Medium".into(),
            key_indicators: strings(&["Bollinger Bands (20, 2)", "RSI (14)", "ADX (14)"]),
            entry_rules: strings(&[
                "Buy a close below the lower band while RSI < 30",
                "Only trade when ADX < 20",
            ]),
            exit_rules: strings(&["Exit at the middle band", "Exit if price closes 1σ below entry"]),
            risk: StrategyRisk {
                stop_loss: "1σ beyond the entry band".into(),
                take_profit: "20-period moving average".into(),
                position_sizing: "Fixed fractional, 2% risk".into(),
                max_drawdown: "15%".into(),
            },
            advantages: strings(&["High win rate in ranges", "Clear targets"]),
            disadvantages: strings(&["Large losses when a trend starts"]),
            papers: strings(&["Lehmann (1990) - Fads, Martingales, and Market Efficiency"]),
        },
        FoundationalStrategy {
            id: "cross_sectional_momentum".into(),
            name: "Cross-Sectional Momentum".into(),
            category: "Momentum".into(),
            traditional_asset: "US equities".into(),
            crypto_adaptation: "Weekly rotation into the top-performing tokens of a liquid universe".into(),
            academic_basis: "Winners keep outperforming losers over 3-12 months".into(),
            complexity: "Advanced".into(),
            volatility: "High".into(),
            key_indicators: strings(&["Rolling 30d return rank", "Volume rank"]),
            entry_rules: strings(&["Hold the top quintile by 30d return", "Rebalance weekly"]),
            exit_rules: strings(&["Drop tokens that leave the top two quintiles"]),
            risk: StrategyRisk {
                stop_loss: "15% per position".into(),
                take_profit: "None, ranking driven".into(),
                position_sizing: "Equal weight".into(),
                max_drawdown: "35%".into(),
            },
            advantages: strings(&["Diversified across winners", "Well documented premium"]),
            disadvantages: strings(&["Momentum crashes", "Turnover costs"]),
            papers: strings(&[
                "Jegadeesh & Titman (1993) - Returns to Buying Winners and Selling Losers",
                "Liu, Tsyvinski & Wu (2022) - Common Risk Factors in Cryptocurrency",
            ]),
        },
    ]
}

pub fn find_foundational(id: &str) -> Option<FoundationalStrategy> {
    foundational_strategies().into_iter().find(|s| s.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_ids_unique() {
        let all = foundational_strategies();
        let mut ids: Vec<_> = all.iter().map(|s| s.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), all.len());
        assert!(find_foundational("turtle_breakout").is_some());
    }
}
