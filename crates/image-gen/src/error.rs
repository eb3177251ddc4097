//! Error types for image generation.

use thiserror::Error;

/// Errors that can occur while generating an image.
#[derive(Debug, Error)]
pub enum ImageError {
    /// Prompt was empty or whitespace.
    #[error("prompt must not be empty")]
    EmptyPrompt,

    /// Aspect ratio is not one of the supported values.
    #[error("unsupported aspect ratio: {0} (expected 16:9, 9:16 or 1:1)")]
    InvalidAspectRatio(String),

    /// No provider registered under this name.
    #[error("unknown image provider: {0}")]
    UnknownProvider(String),

    /// Missing or invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Request never produced an HTTP response.
    #[error("network error: {0}")]
    Network(String),

    /// Provider answered with a failure status.
    #[error("provider error ({status}): {message}")]
    Status { status: u16, message: String },

    /// Response body did not contain a usable image.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ImageError {
    /// Whether the request itself was at fault, so retrying it cannot help.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ImageError::EmptyPrompt
                | ImageError::InvalidAspectRatio(_)
                | ImageError::UnknownProvider(_)
        )
    }
}
