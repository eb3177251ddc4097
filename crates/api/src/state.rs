//! Application state shared across handlers.

use studio::Studio;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Studio service.
    pub studio: Studio,
    /// Expected bearer token, if any.
    pub api_token: Option<String>,
}

impl AppState {
    /// Create new application state.
    pub fn new(studio: Studio, api_token: Option<String>) -> Self {
        Self { studio, api_token }
    }
}
