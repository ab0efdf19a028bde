//! Strategy Wizard
//!
//! Step layouts, per-step payloads and the state machine that ties them together.

mod layout;
mod payload;
mod state;

pub use layout::{Step, StepKind, WizardLayout};
pub use payload::StepPayload;
pub use state::{StepView, StrategyWizard, WizardView};
