//! Error types for chat completions.

use thiserror::Error;

/// Errors that can occur while asking a model for a completion.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Missing or invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Request never produced an HTTP response.
    #[error("network error: {0}")]
    Network(String),

    /// Provider answered with a failure status.
    #[error("API error ({status}): {message}")]
    Status { status: u16, message: String },

    /// Response body could not be understood.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Provider answered but produced no text.
    #[error("model returned an empty completion")]
    EmptyCompletion,
}

impl ChatError {
    /// HTTP status of the failure, when the provider reported one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ChatError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
