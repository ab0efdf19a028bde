//! Fixed prompt text per model target

use crate::model::ModelTarget;

const GEMINI_PREAMBLE: &str = "[CRYPTO TRADING STRATEGY GENERATION]

You are an expert crypto trading strategist with deep knowledge of traditional finance, technical analysis, and Solana ecosystem dynamics. Generate a comprehensive, actionable trading strategy based on the following inputs:

";

const GPT_PREAMBLE: &str = "[CRYPTO TRADING STRATEGY GENERATION]

You are a professional crypto trading advisor. Create a detailed trading strategy based on the provided information.

## Strategy Context
";

const CLAUDE_PREAMBLE: &str = "[CRYPTO TRADING STRATEGY GENERATION]

As an expert crypto trading strategist, I need you to analyze the following inputs and generate a comprehensive trading strategy.

## Input Analysis
";

const GEMINI_INSTRUCTION: &str = "
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

const GPT_INSTRUCTION: &str = "
## INSTRUCTION
Based on the provided information, create a comprehensive trading strategy that includes:
1. Strategy overview and objectives
2. Entry and exit criteria
3. Risk management rules
4. Technical analysis framework
5. Performance monitoring plan
6. Implementation guidelines";

const CLAUDE_INSTRUCTION: &str = "
## INSTRUCTION
Please provide a detailed analysis and strategy recommendation based on the inputs above. Include:
1. Strategy synthesis and key insights
2. Implementation framework
3. Risk assessment and mitigation
4. Performance expectations
5. Execution guidelines";

pub fn preamble(target: ModelTarget) -> &'static str {
    match target {
        ModelTarget::Gemini => GEMINI_PREAMBLE,
        ModelTarget::Gpt => GPT_PREAMBLE,
        ModelTarget::Claude => CLAUDE_PREAMBLE,
    }
}

pub fn instruction(target: ModelTarget) -> &'static str {
    match target {
        ModelTarget::Gemini => GEMINI_INSTRUCTION,
        ModelTarget::Gpt => GPT_INSTRUCTION,
        ModelTarget::Claude => CLAUDE_INSTRUCTION,
    }
}

/// Canned lines appended after an uploaded research summary
pub const RESEARCH_NOTES: &str = "Research Integration Notes:
- Research findings have been incorporated into strategy development
- Market context from research supports strategy direction
- Risk factors identified in research have been considered
";
