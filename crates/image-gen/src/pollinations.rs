//! Pollinations image URLs.
//!
//! Pollinations renders on first fetch of the URL, so generating an image is
//! only a matter of building the right URL.

use async_trait::async_trait;
use tracing::debug;

use crate::aspect::AspectRatio;
use crate::error::ImageError;
use crate::generator::{ImageGenerator, ImageOutput, ImageRequest};

/// Default Pollinations image endpoint.
pub const DEFAULT_POLLINATIONS_URL: &str = "https://gen.pollinations.ai/image";

/// Keyless generator backed by Pollinations.
#[derive(Debug, Clone)]
pub struct PollinationsGenerator {
    base_url: String,
}

impl Default for PollinationsGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_POLLINATIONS_URL)
    }
}

impl PollinationsGenerator {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the image URL for a prompt.
    pub fn image_url(&self, prompt: &str, aspect_ratio: AspectRatio, seed: u32) -> String {
        let (width, height) = aspect_ratio.dimensions();
        format!(
            "{}/{}?width={}&height={}&seed={}&nologo=true",
            self.base_url,
            urlencoding::encode(prompt),
            width,
            height,
            seed
        )
    }
}

#[async_trait]
impl ImageGenerator for PollinationsGenerator {
    async fn generate(&self, request: &ImageRequest) -> Result<ImageOutput, ImageError> {
        let prompt = request.validated_prompt()?;
        let seed = request.seed_or_random();
        let url = self.image_url(prompt, request.aspect_ratio, seed);

        debug!("Pollinations URL built: seed={}, ratio={}", seed, request.aspect_ratio);

        Ok(ImageOutput {
            url,
            provider: self.name().to_string(),
            seed,
        })
    }

    fn name(&self) -> &str {
        "pollinations"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_encodes_prompt_and_dimensions() {
        let generator = PollinationsGenerator::default();
        let url = generator.image_url("neon city & rain?", AspectRatio::Portrait, 1234);
        assert_eq!(
            url,
            "https://gen.pollinations.ai/image/neon%20city%20%26%20rain%3F?width=900&height=1600&seed=1234&nologo=true"
        );
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let generator = PollinationsGenerator::new("http://localhost/image/");
        assert_eq!(
            generator.image_url("x", AspectRatio::Square, 1),
            "http://localhost/image/x?width=1024&height=1024&seed=1&nologo=true"
        );
    }

    #[tokio::test]
    async fn test_generate_uses_trimmed_prompt() {
        let generator = PollinationsGenerator::default();
        let request = ImageRequest::new("  cat  ").with_seed(7);
        let output = generator.generate(&request).await.unwrap();
        assert_eq!(
            output.url,
            "https://gen.pollinations.ai/image/cat?width=1600&height=900&seed=7&nologo=true"
        );
        assert_eq!(output.provider, "pollinations");
        assert_eq!(output.seed, 7);
    }

    #[tokio::test]
    async fn test_generate_rejects_empty_prompt() {
        let generator = PollinationsGenerator::default();
        let err = generator.generate(&ImageRequest::new("")).await.unwrap_err();
        assert!(matches!(err, ImageError::EmptyPrompt));
    }
}
