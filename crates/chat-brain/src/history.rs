//! Conversation assembly from stored chat history.

use crate::api_types::ChatMessage;

/// A conversation ready to be sent to any tier.
///
/// History is kept as plain text turns; the image is attached to the new
/// user message only when the tier being attempted can see it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conversation {
    system_prompt: Option<String>,
    turns: Vec<ChatMessage>,
    text: String,
    image_url: Option<String>,
}

impl Conversation {
    /// Start a conversation whose newest user message is `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Attach an image to the newest user message.
    pub fn with_image(mut self, image_url: impl Into<String>) -> Self {
        let url = image_url.into();
        self.image_url = if url.trim().is_empty() { None } else { Some(url) };
        self
    }

    /// Set or clear the system prompt.
    pub fn with_system_prompt(mut self, prompt: Option<String>) -> Self {
        self.system_prompt = prompt;
        self
    }

    /// Append a stored turn by its role name.
    ///
    /// `user` stays `user`, `bot` becomes `assistant`; `error` entries and
    /// unknown roles are dropped. Returns whether the turn was kept.
    pub fn push_stored(&mut self, role: &str, text: &str) -> bool {
        let message = match role {
            "user" => ChatMessage::user(text),
            "bot" => ChatMessage::assistant(text),
            _ => return false,
        };
        self.turns.push(message);
        true
    }

    /// Build a conversation from stored `(role, text)` pairs, oldest first.
    pub fn from_stored<'a, I>(history: I, text: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut conversation = Self::new(text);
        for (role, body) in history {
            conversation.push_stored(role, body);
        }
        conversation
    }

    /// Whether an image is attached.
    pub fn has_image(&self) -> bool {
        self.image_url.is_some()
    }

    /// Number of history turns kept.
    pub fn history_len(&self) -> usize {
        self.turns.len()
    }

    /// The newest user message text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Render the request messages, with or without the image part.
    pub fn messages(&self, attach_image: bool) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(self.turns.len() + 2);

        if let Some(ref prompt) = self.system_prompt {
            messages.push(ChatMessage::system(prompt.clone()));
        }

        messages.extend(self.turns.iter().cloned());

        match (&self.image_url, attach_image) {
            (Some(url), true) => messages.push(ChatMessage::user_with_image(&self.text, url)),
            _ => messages.push(ChatMessage::user(&self.text)),
        }

        messages
    }
}
