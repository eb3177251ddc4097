//! Aether Studio service layer.
//!
//! Ties SQLite storage to the image providers and the chat fallback chain.
//! Every operation is keyed by an identity-provider user id that the caller
//! has already authenticated.
//!
//! # Example
//!
//! ```rust,no_run
//! use database::Database;
//! use studio::{GenerateImage, Studio};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("sqlite:studio.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     let studio = Studio::from_env(db)?;
//!     studio.record_login("user_2abc").await?;
//!
//!     let image = studio
//!         .generate_image("user_2abc", GenerateImage::new("a lighthouse at dusk"))
//!         .await?;
//!     let reply = studio
//!         .send_chat_message("user_2abc", "What mood does this set?", Some(&image.url))
//!         .await?;
//!     println!("{}: {}", reply.role, reply.text);
//!     Ok(())
//! }
//! ```

mod error;
mod service;
mod types;
pub mod validation;

pub use error::{Result, StudioError};
pub use service::{Studio, DEFAULT_ACTIVITY_LIMIT, MAX_ACTIVITY_LIMIT};
pub use types::{GenerateImage, SavedImage};
