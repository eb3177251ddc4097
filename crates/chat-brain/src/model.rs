//! The trait every completion backend implements.

use async_trait::async_trait;

use crate::api_types::ChatMessage;
use crate::error::ChatError;

/// A single completion request against one model.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Model identifier, e.g. "google/gemini-2.0-flash-exp:free".
    pub model: String,
    /// Full message list, system prompt first.
    pub messages: Vec<ChatMessage>,
}

impl CompletionRequest {
    /// Whether the request carries an image part.
    pub fn has_image(&self) -> bool {
        self.messages.iter().any(ChatMessage::has_image)
    }
}

/// Successful completion text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Model that answered, as reported by the provider.
    pub model: String,
    /// Completion text.
    pub text: String,
}

/// A backend that turns a message list into a completion.
///
/// # Example
///
/// ```rust
/// use chat_brain::{async_trait, ChatError, ChatModel, Completion, CompletionRequest};
///
/// struct Parrot;
///
/// #[async_trait]
/// impl ChatModel for Parrot {
///     async fn complete(&self, request: CompletionRequest) -> Result<Completion, ChatError> {
///         Ok(Completion {
///             model: request.model,
///             text: "squawk".to_string(),
///         })
///     }
///
///     fn name(&self) -> &str {
///         "Parrot"
///     }
/// }
/// ```
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Ask the backend for one completion. No retries.
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, ChatError>;

    /// Backend name for logs.
    fn name(&self) -> &str;
}
