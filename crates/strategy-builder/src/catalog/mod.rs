//! Catalogs
//!
//! Static reference data offered by the wizard: tokens, proven parameter
//! presets, and traditional-finance strategies used as a foundation.

mod foundational;
mod presets;
mod tokens;

pub use foundational::{foundational_strategies, find_foundational, FoundationalStrategy, StrategyRisk};
pub use presets::{find_preset, proven_presets, ProvenPreset};
pub use tokens::{find_token, token_directory};
