//! Error Types for the Strategy Builder

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strategy_core::GenerationError;
use thiserror::Error;

use crate::wizard::StepKind;

pub type Result<T> = std::result::Result<T, BuilderError>;

/// Rejected user input on a parameter-entry step
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} must be greater than 0% (got {value}%)")]
    NonPositive { field: &'static str, value: Decimal },

    #[error("Asset symbol must not be empty")]
    EmptyAsset,
}

#[derive(Error, Debug)]
pub enum BuilderError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Strategy generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("{collaborator} unavailable: {message}")]
    CollaboratorFetch {
        collaborator: &'static str,
        message: String,
    },

    #[error("Step {index} is outside the wizard (0..{len})")]
    StepOutOfRange { index: usize, len: usize },

    #[error("Step {0} cannot be skipped")]
    NotSkippable(usize),

    #[error("This wizard has no {0:?} step")]
    StepNotInLayout(StepKind),

    #[error("A strategy generation is already in progress")]
    Busy,

    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    #[error("Unknown foundational strategy: {0}")]
    UnknownStrategy(String),

    #[error("No strategy has been generated yet")]
    NothingGenerated,
}

impl BuilderError {
    pub fn collaborator(collaborator: &'static str, message: impl Into<String>) -> Self {
        BuilderError::CollaboratorFetch {
            collaborator,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            BuilderError::Validation(_) => ErrorKind::Validation,
            BuilderError::Generation(_) => ErrorKind::Generation,
            BuilderError::CollaboratorFetch { .. } => ErrorKind::CollaboratorFetch,
            _ => ErrorKind::Wizard,
        }
    }

    /// Message suitable for showing next to the wizard controls
    pub fn user_message(&self) -> String {
        match self {
            BuilderError::Generation(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

/// Error category recorded on the wizard
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Generation,
    CollaboratorFetch,
    Wizard,
}

/// Last error surfaced to the user; never fatal
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl From<&BuilderError> for ErrorInfo {
    fn from(err: &BuilderError) -> Self {
        Self {
            kind: err.kind(),
            message: err.user_message(),
            at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_validation_message_names_field() {
        let err = BuilderError::from(ValidationError::NonPositive {
            field: "Stop Loss",
            value: dec!(-1),
        });
        let info = ErrorInfo::from(&err);
        assert_eq!(info.kind, ErrorKind::Validation);
        assert!(info.message.contains("Stop Loss"));
    }

    #[test]
    fn test_generation_error_uses_friendly_message() {
        let err = BuilderError::from(GenerationError::Transport("connection reset".into()));
        let info = ErrorInfo::from(&err);
        assert_eq!(info.kind, ErrorKind::Generation);
        assert!(info.message.contains("connection reset"));
    }

    #[test]
    fn test_navigation_errors_are_wizard_kind() {
        let errors = [
            BuilderError::StepOutOfRange { index: 12, len: 9 },
            BuilderError::NotSkippable(4),
            BuilderError::StepNotInLayout(StepKind::Research),
            BuilderError::Busy,
            BuilderError::UnknownPreset("nope".into()),
            BuilderError::UnknownStrategy("nope".into()),
            BuilderError::NothingGenerated,
        ];
        for err in &errors {
            assert_eq!(err.kind(), ErrorKind::Wizard);
            assert_eq!(err.user_message(), err.to_string());
        }
        assert_eq!(
            BuilderError::collaborator("Sentiment analysis", "timeout").kind(),
            ErrorKind::CollaboratorFetch
        );
    }
}
