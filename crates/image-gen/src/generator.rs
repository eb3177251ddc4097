//! The trait every image backend implements.

use async_trait::async_trait;
use rand::Rng;

use crate::aspect::AspectRatio;
use crate::error::ImageError;

/// Exclusive upper bound for generated seeds.
pub const SEED_RANGE: u32 = 100_000;

/// A request for one image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRequest {
    pub prompt: String,
    pub aspect_ratio: AspectRatio,
    /// Fixed seed; a random one is drawn when absent.
    pub seed: Option<u32>,
    pub negative_prompt: Option<String>,
}

impl ImageRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            aspect_ratio: AspectRatio::default(),
            seed: None,
            negative_prompt: None,
        }
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: AspectRatio) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_negative_prompt(mut self, negative: impl Into<String>) -> Self {
        let negative = negative.into();
        self.negative_prompt = if negative.trim().is_empty() {
            None
        } else {
            Some(negative)
        };
        self
    }

    /// The trimmed prompt, or `EmptyPrompt`.
    pub fn validated_prompt(&self) -> Result<&str, ImageError> {
        let prompt = self.prompt.trim();
        if prompt.is_empty() {
            Err(ImageError::EmptyPrompt)
        } else {
            Ok(prompt)
        }
    }

    /// The requested seed or a fresh random one.
    pub fn seed_or_random(&self) -> u32 {
        self.seed
            .unwrap_or_else(|| rand::thread_rng().gen_range(0..SEED_RANGE))
    }
}

/// A generated image, ready to be stored or displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageOutput {
    /// Public URL or `data:` URL.
    pub url: String,
    /// Name of the provider that produced it.
    pub provider: String,
    pub seed: u32,
}

/// A backend that turns a prompt into an image URL.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, request: &ImageRequest) -> Result<ImageOutput, ImageError>;

    /// Provider name used for selection and logs.
    fn name(&self) -> &str;
}
