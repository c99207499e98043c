//! Common error types for Janus components.

use thiserror::Error;

/// Common errors across Janus components
#[derive(Debug, Error)]
pub enum JanusError {
    /// Configuration error (missing secrets, invalid keys)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The siteverify call could not be completed (network-level failure)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Redis connection/operation error
    #[error("Store error: {0}")]
    Store(String),

    /// Invalid input/request
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl JanusError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Config(_) => 500,
            Self::Transport(_) => 502,
            Self::Store(_) => 503,
            Self::InvalidInput(_) => 400,
            Self::Internal(_) => 500,
        }
    }

    /// Returns true if this error should be retried
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Store(_))
    }
}
