//! Error Types

use thiserror::Error;

/// Result type alias for LLM operations
pub type Result<T> = std::result::Result<T, GenerationError>;

/// Failures of a single generation request against an LLM backend
#[derive(Error, Debug)]
pub enum GenerationError {
    /// Network or transport failure (connect, timeout, reset)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Backend answered with a non-2xx status
    #[error("Provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Body could not be understood
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Backend answered successfully but produced no text
    #[error("Provider returned an empty response")]
    EmptyResponse,

    /// Provider unavailable or not responding
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Rate limited
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other/unknown error
    #[error("{0}")]
    Other(String),
}

impl GenerationError {
    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            GenerationError::Transport(_)
            | GenerationError::ProviderUnavailable(_)
            | GenerationError::RateLimited(_) => true,
            GenerationError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Short machine-readable tag, used in API error bodies
    pub fn code(&self) -> &'static str {
        match self {
            GenerationError::Transport(_) => "TRANSPORT",
            GenerationError::Status { .. } => "BAD_STATUS",
            GenerationError::InvalidResponse(_) => "INVALID_RESPONSE",
            GenerationError::EmptyResponse => "EMPTY_RESPONSE",
            GenerationError::ProviderUnavailable(_) => "UNAVAILABLE",
            GenerationError::RateLimited(_) => "RATE_LIMITED",
            GenerationError::Auth(_) => "AUTH",
            GenerationError::Config(_) => "CONFIG",
            GenerationError::Json(_) => "JSON",
            GenerationError::Other(_) => "OTHER",
        }
    }

    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            GenerationError::Transport(msg) => {
                format!("Could not reach the AI service: {}", msg)
            }
            GenerationError::Status { status, .. } => {
                format!("The AI service rejected the request (HTTP {}).", status)
            }
            GenerationError::InvalidResponse(_) => {
                "The AI service returned a response that could not be read.".into()
            }
            GenerationError::EmptyResponse => {
                "The AI service returned an empty strategy. Please try again.".into()
            }
            GenerationError::ProviderUnavailable(_) => {
                "The AI service is currently unavailable. Please try again.".into()
            }
            GenerationError::RateLimited(_) => {
                "You've made too many requests. Please wait a moment.".into()
            }
            GenerationError::Auth(_) => {
                "Authentication with the AI service failed. Please check your API key.".into()
            }
            GenerationError::Config(msg) => format!("The AI service is misconfigured: {}", msg),
            _ => "An unexpected error occurred.".into(),
        }
    }
}

impl From<anyhow::Error> for GenerationError {
    fn from(err: anyhow::Error) -> Self {
        GenerationError::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(GenerationError::Transport("reset".into()).is_retryable());
        assert!(GenerationError::Status { status: 503, body: String::new() }.is_retryable());
        assert!(!GenerationError::Status { status: 400, body: String::new() }.is_retryable());
        assert!(!GenerationError::EmptyResponse.is_retryable());
    }

    #[test]
    fn test_user_messages_are_never_empty() {
        let errors = [
            GenerationError::Transport("connection refused".into()),
            GenerationError::Status { status: 500, body: "boom".into() },
            GenerationError::InvalidResponse("not json".into()),
            GenerationError::EmptyResponse,
            GenerationError::Other("x".into()),
        ];
        for err in errors {
            assert!(!err.user_message().is_empty());
        }
    }
}
