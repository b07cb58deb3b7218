// src/error.rs
// Error types for the poem streaming server

use thiserror::Error;

/// Main error type for poem generation and analysis
#[derive(Error, Debug)]
pub enum PoemError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("generation failed: {0}")]
    Generation(String),

    #[error("classification failed: {0}")]
    Classification(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("transport error: {0}")]
    Transport(String),
}

/// Convenience type alias for Result using PoemError
pub type PoemResult<T> = std::result::Result<T, PoemError>;

impl PoemError {
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    pub fn generation(msg: impl Into<String>) -> Self {
        Self::Generation(msg.into())
    }

    pub fn classification(msg: impl Into<String>) -> Self {
        Self::Classification(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Stable code sent to the client in `poem_error` events
    pub fn code(&self) -> &'static str {
        match self {
            PoemError::InvalidRequest(_) => "invalid_request",
            PoemError::Generation(_) => "generation_failed",
            PoemError::Classification(_) => "classification_failed",
            PoemError::Http(_) => "upstream_unavailable",
            PoemError::Json(_) => "malformed_message",
            PoemError::Config(_) => "configuration_error",
            PoemError::Transport(_) => "transport_error",
        }
    }
}
