//! Token directory
//!
//! Static Solana token list. Market figures are indicative only.

use rust_decimal_macros::dec;

use crate::model::TokenInfo;

pub fn token_directory() -> Vec<TokenInfo> {
    vec![
        TokenInfo {
            symbol: "SOL".into(),
            name: "Solana".into(),
            address: "So11111111111111111111111111111111111111112".into(),
            category: "Layer 1".into(),
            description: "Native token of the Solana blockchain".into(),
            market_cap: Some(dec!(92_500_000_000)),
            price: Some(dec!(195)),
            volume_24h: Some(dec!(3_000_000_000)),
        },
        TokenInfo {
            symbol: "JUP".into(),
            name: "Jupiter".into(),
            address: "JUPyiwrYJFskUPiHa7hkeR8VUtAeFoSYbKedZNsDvCN".into(),
            category: "DeFi".into(),
            description: "Governance token of the Jupiter swap aggregator".into(),
            market_cap: Some(dec!(1_350_000_000)),
            price: Some(dec!(1.00)),
            volume_24h: Some(dec!(95_000_000)),
        },
        TokenInfo {
            symbol: "RAY".into(),
            name: "Raydium".into(),
            address: "4k3Dyjzvzp8eMZWUXbBCjEvwSkkk59S5iCNLY3QrkX6R".into(),
            category: "DeFi".into(),
            description: "AMM and liquidity provider on Solana".into(),
            market_cap: Some(dec!(1_200_000_000)),
            price: Some(dec!(4.10)),
            volume_24h: Some(dec!(60_000_000)),
        },
        TokenInfo {
            symbol: "BONK".into(),
            name: "Bonk".into(),
            address: "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263".into(),
            category: "Meme".into(),
            description: "Community dog-themed meme coin".into(),
            market_cap: Some(dec!(2_100_000_000)),
            price: Some(dec!(0.000028)),
            volume_24h: Some(dec!(250_000_000)),
        },
        TokenInfo {
            symbol: "PYTH".into(),
            name: "Pyth Network".into(),
            address: "HZ1JovNiVvGrGNiiYvEozEVgZ58xaU3RKwX8eACQBCt3".into(),
            category: "Oracle".into(),
            description: "First-party price oracle network".into(),
            market_cap: None,
            price: None,
            volume_24h: None,
        },
    ]
}

/// Case-insensitive lookup by symbol
pub fn find_token(symbol: &str) -> Option<TokenInfo> {
    token_directory()
        .into_iter()
        .find(|t| t.symbol.eq_ignore_ascii_case(symbol.trim()))
}
