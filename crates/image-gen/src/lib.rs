//! Image generation for Aether Studio.
//!
//! Two providers sit behind the [`ImageGenerator`] trait:
//!
//! - [`PollinationsGenerator`] - keyless; the image is a deterministic URL
//! - [`NimClient`] - NVIDIA NIM Stable Diffusion 3.5; returns a `data:` URL
//!
//! [`ImageProviders`] holds the configured generators and picks one by name.
//!
//! # Example
//!
//! ```rust
//! use image_gen::{AspectRatio, ImageGenerator, ImageRequest, PollinationsGenerator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), image_gen::ImageError> {
//!     let generator = PollinationsGenerator::default();
//!     let request = ImageRequest::new("lighthouse in a storm")
//!         .with_aspect_ratio(AspectRatio::Square)
//!         .with_seed(9);
//!
//!     let image = generator.generate(&request).await?;
//!     assert!(image.url.contains("width=1024&height=1024&seed=9"));
//!     Ok(())
//! }
//! ```

mod aspect;
mod error;
mod generator;
mod nim;
mod pollinations;
mod prompts;
mod registry;

pub use aspect::AspectRatio;
pub use error::ImageError;
pub use generator::{ImageGenerator, ImageOutput, ImageRequest, SEED_RANGE};
pub use nim::{decode_image, NimClient, NimConfig, DEFAULT_NIM_URL};
pub use pollinations::{PollinationsGenerator, DEFAULT_POLLINATIONS_URL};
pub use prompts::{random_prompt, POPULAR_PROMPTS};
pub use registry::ImageProviders;

pub use async_trait::async_trait;
