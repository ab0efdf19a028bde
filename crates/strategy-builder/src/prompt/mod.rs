//! Prompt Composition
//!
//! Turns wizard inputs into the text sent to the LLM.

mod compose;
mod templates;

pub use compose::{AuxiliaryInputs, PromptComposer, SectionNumbering};
