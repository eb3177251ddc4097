//! Error types for studio operations.

use chat_brain::ChatError;
use database::DatabaseError;
use image_gen::ImageError;
use thiserror::Error;

/// Errors that can occur in the studio service.
#[derive(Debug, Error)]
pub enum StudioError {
    /// Input rejected before any upstream call.
    #[error("invalid input: {0}")]
    Validation(String),

    /// Record missing or not owned by the caller.
    #[error("not found: {0}")]
    NotFound(String),

    /// Storage failed.
    #[error("database error: {0}")]
    Database(DatabaseError),

    /// Image provider failed.
    #[error("image generation failed: {0}")]
    Image(ImageError),

    /// A component could not be built from the environment.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl From<DatabaseError> for StudioError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound { entity, id } => {
                StudioError::NotFound(format!("{} {}", entity, id))
            }
            other => StudioError::Database(other),
        }
    }
}

impl From<ImageError> for StudioError {
    fn from(err: ImageError) -> Self {
        if err.is_validation() {
            StudioError::Validation(err.to_string())
        } else {
            StudioError::Image(err)
        }
    }
}

impl From<ChatError> for StudioError {
    fn from(err: ChatError) -> Self {
        StudioError::Configuration(err.to_string())
    }
}

/// Result type for studio operations.
pub type Result<T> = std::result::Result<T, StudioError>;
