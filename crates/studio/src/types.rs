//! Request and result types shared with the HTTP layer.

use serde::{Deserialize, Serialize};

/// Parameters for generating a gallery image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GenerateImage {
    pub prompt: String,
    /// "16:9", "9:16" or "1:1"; 16:9 when absent.
    #[serde(default)]
    pub aspect_ratio: Option<String>,
    /// Provider name; the configured default when absent.
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub seed: Option<u32>,
    #[serde(default)]
    pub negative_prompt: Option<String>,
}

impl GenerateImage {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }
}

/// A generated image as returned to the caller.
///
/// `id` is None when the image was generated but could not be stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedImage {
    pub id: Option<i64>,
    pub url: String,
    pub prompt: String,
    pub aspect_ratio: String,
    pub timestamp: String,
    pub provider: String,
    pub seed: u32,
}
