//! OpenRouter chat client with tiered model fallback.
//!
//! This crate talks to OpenRouter's OpenAI-compatible chat completions API
//! and walks an ordered list of model tiers until one answers:
//!
//! - **Primary** and **Secondary** tiers are vision models and receive the
//!   image attached to the newest message
//! - the **Fallback** tier is text-only; its replies carry a disclaimer
//!
//! Responses can be read as plain JSON or as an SSE stream.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use chat_brain::{ChatBrainConfig, Conversation, FallbackChain, OpenRouterClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ChatBrainConfig::from_env()?;
//!     let tiers = config.tiers();
//!     let prompt = config.system_prompt.clone();
//!     let chain = FallbackChain::new(Arc::new(OpenRouterClient::new(config)?), tiers);
//!
//!     let conversation = Conversation::new("What style is this?")
//!         .with_image("https://gen.pollinations.ai/image/neon%20city")
//!         .with_system_prompt(prompt);
//!
//!     match chain.run(&conversation).await {
//!         Ok(reply) => println!("{}", reply.display_text()),
//!         Err(exhausted) => println!("{}", exhausted.user_message()),
//!     }
//!     Ok(())
//! }
//! ```

mod api_types;
mod client;
mod config;
mod error;
mod fallback;
mod history;
pub mod mock;
mod model;
pub mod stream;

pub use api_types::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ContentPart, ImageUrl,
    MessageContent,
};
pub use client::OpenRouterClient;
pub use config::{ChatBrainConfig, ChatBrainConfigBuilder, DEFAULT_API_URL, DEFAULT_PROMPT_FILE};
pub use error::ChatError;
pub use fallback::{
    ChainExhausted, ChainReply, FallbackChain, ModelTier, TierFailure, TierKind,
    FALLBACK_DISCLAIMER, QUOTA_MESSAGE, RATE_LIMIT_MESSAGE,
};
pub use history::Conversation;
pub use model::{ChatModel, Completion, CompletionRequest};

pub use async_trait::async_trait;
