//! The studio service: one entry point per user-facing operation.

use std::sync::Arc;

use chat_brain::{ChatBrainConfig, Conversation, FallbackChain, OpenRouterClient};
use chrono::{DateTime, Utc};
use database::{
    activity, chat_message, image, streak, user_profile, ActivityRecord, ChatMessage, ChatRole,
    Database, GeneratedImage, LoginOutcome, NewImage, UserProfile,
};
use image_gen::{AspectRatio, ImageProviders, ImageRequest};
use tracing::{debug, error, info, warn};

use crate::error::{Result, StudioError};
use crate::types::{GenerateImage, SavedImage};
use crate::validation::{self, MAX_PROMPT_LENGTH};

/// Default number of activity records returned.
pub const DEFAULT_ACTIVITY_LIMIT: i64 = 30;

/// Upper bound on requested activity records.
pub const MAX_ACTIVITY_LIMIT: i64 = 365;

/// Storage plus the image and chat providers.
#[derive(Clone)]
pub struct Studio {
    db: Database,
    images: ImageProviders,
    chat: FallbackChain,
    system_prompt: Option<String>,
}

impl Studio {
    pub fn new(db: Database, images: ImageProviders, chat: FallbackChain) -> Self {
        Self {
            db,
            images,
            chat,
            system_prompt: None,
        }
    }

    /// Set the system prompt sent ahead of every chat.
    pub fn with_system_prompt(mut self, prompt: Option<String>) -> Self {
        self.system_prompt = prompt;
        self
    }

    /// Build the providers from environment variables.
    ///
    /// See `ChatBrainConfig::from_env` and `ImageProviders::from_env`.
    pub fn from_env(db: Database) -> Result<Self> {
        let chat_config = ChatBrainConfig::from_env()?;
        let tiers = chat_config.tiers();
        let system_prompt = chat_config.system_prompt.clone();
        let client = OpenRouterClient::new(chat_config)?;

        let images = ImageProviders::from_env()
            .map_err(|e| StudioError::Configuration(e.to_string()))?;

        Ok(Self::new(db, images, FallbackChain::new(Arc::new(client), tiers))
            .with_system_prompt(system_prompt))
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn image_providers(&self) -> &ImageProviders {
        &self.images
    }

    /// Count a login now.
    pub async fn record_login(&self, user_id: &str) -> Result<LoginOutcome> {
        self.record_login_at(user_id, Utc::now()).await
    }

    /// Count a login at a given instant.
    pub async fn record_login_at(&self, user_id: &str, now: DateTime<Utc>) -> Result<LoginOutcome> {
        let user_id = validation::user_id(user_id)?;
        let outcome = streak::record_login(self.db.pool(), user_id, now).await?;

        if outcome.is_new_day {
            info!(user_id, streak = outcome.streak, "Login recorded");
        }
        Ok(outcome)
    }

    pub async fn profile(&self, user_id: &str) -> Result<Option<UserProfile>> {
        let user_id = validation::user_id(user_id)?;
        Ok(user_profile::get_profile(self.db.pool(), user_id).await?)
    }

    /// Recent logins, newest first. `limit` is clamped to `1..=MAX_ACTIVITY_LIMIT`.
    pub async fn activity(&self, user_id: &str, limit: Option<i64>) -> Result<Vec<ActivityRecord>> {
        let user_id = validation::user_id(user_id)?;
        let limit = limit
            .unwrap_or(DEFAULT_ACTIVITY_LIMIT)
            .clamp(1, MAX_ACTIVITY_LIMIT);
        Ok(activity::list_activity(self.db.pool(), user_id, limit).await?)
    }

    /// Generate an image and save it to the user's gallery.
    ///
    /// Generation failures propagate. Once an image exists, storage failures
    /// are logged and the image is returned without an id.
    pub async fn generate_image(&self, user_id: &str, params: GenerateImage) -> Result<SavedImage> {
        let user_id = validation::user_id(user_id)?;

        let aspect_ratio = match params.aspect_ratio.as_deref() {
            Some(ratio) => ratio.parse::<AspectRatio>()?,
            None => AspectRatio::default(),
        };

        let prompt = validation::required("prompt", &params.prompt, MAX_PROMPT_LENGTH)?.to_string();
        let mut request = ImageRequest::new(prompt.clone()).with_aspect_ratio(aspect_ratio);
        if let Some(seed) = params.seed {
            request = request.with_seed(seed);
        }
        if let Some(negative) = params.negative_prompt {
            request = request.with_negative_prompt(negative);
        }

        let generator = self.images.get(params.provider.as_deref())?;
        debug!(user_id, provider = generator.name(), "Generating image");

        let output = generator.generate(&request).await?;
        let timestamp = Utc::now().to_rfc3339();

        let mut saved = SavedImage {
            id: None,
            url: output.url,
            prompt,
            aspect_ratio: aspect_ratio.as_str().to_string(),
            timestamp,
            provider: output.provider,
            seed: output.seed,
        };

        let new_image = NewImage {
            user_id,
            url: &saved.url,
            prompt: &saved.prompt,
            aspect_ratio: &saved.aspect_ratio,
            timestamp: &saved.timestamp,
        };

        match image::insert_image(self.db.pool(), &new_image).await {
            Ok(stored) => {
                saved.id = Some(stored.id);
                if let Err(e) = user_profile::increment_image_count(self.db.pool(), user_id).await {
                    error!(user_id, "Failed to update image count: {}", e);
                }
                info!(user_id, image_id = stored.id, provider = %saved.provider, "Image saved");
            }
            Err(e) => {
                error!(user_id, "Generated image could not be saved: {}", e);
            }
        }

        Ok(saved)
    }

    /// The user's gallery, newest first.
    pub async fn list_images(&self, user_id: &str) -> Result<Vec<GeneratedImage>> {
        let user_id = validation::user_id(user_id)?;
        Ok(image::list_images(self.db.pool(), user_id).await?)
    }

    /// Delete one of the user's images. Another user's image is not found.
    pub async fn delete_image(&self, user_id: &str, image_id: i64) -> Result<()> {
        let user_id = validation::user_id(user_id)?;
        image::delete_image(self.db.pool(), user_id, image_id).await?;
        info!(user_id, image_id, "Image deleted");
        Ok(())
    }

    /// Stored chat messages, oldest first.
    pub async fn messages(&self, user_id: &str) -> Result<Vec<ChatMessage>> {
        let user_id = validation::user_id(user_id)?;
        Ok(chat_message::list_messages(self.db.pool(), user_id).await?)
    }

    /// Delete the user's chat. Returns the number of messages removed.
    pub async fn clear_messages(&self, user_id: &str) -> Result<u64> {
        let user_id = validation::user_id(user_id)?;
        let deleted = chat_message::clear_messages(self.db.pool(), user_id).await?;
        info!(user_id, deleted, "Chat cleared");
        Ok(deleted)
    }

    /// Send a chat message using the user's stored history.
    pub async fn send_chat_message(
        &self,
        user_id: &str,
        text: &str,
        image_url: Option<&str>,
    ) -> Result<ChatMessage> {
        let history = self.messages(user_id).await?;
        self.send_chat_message_with_history(user_id, text, image_url, &history)
            .await
    }

    /// Send a chat message with explicit prior history.
    ///
    /// The user's message is stored first. The reply is stored as `bot`, or
    /// as `error` carrying a readable cause when every tier fails; either
    /// way the stored reply is returned.
    pub async fn send_chat_message_with_history(
        &self,
        user_id: &str,
        text: &str,
        image_url: Option<&str>,
        history: &[ChatMessage],
    ) -> Result<ChatMessage> {
        let user_id = validation::user_id(user_id)?;
        let text = validation::chat_text(text)?;
        let image_url = validation::image_url(image_url)?;

        let pool = self.db.pool();
        chat_message::insert_message(pool, user_id, ChatRole::User, text, &Utc::now().to_rfc3339())
            .await?;

        let mut conversation = Conversation::from_stored(
            history.iter().map(|m| (m.role.as_str(), m.text.as_str())),
            text,
        )
        .with_system_prompt(self.system_prompt.clone());
        if let Some(url) = image_url {
            conversation = conversation.with_image(url);
        }

        debug!(
            user_id,
            history = conversation.history_len(),
            image = conversation.has_image(),
            "Running chat chain"
        );

        let (role, reply) = match self.chat.run(&conversation).await {
            Ok(reply) => {
                info!(
                    user_id,
                    tier = %reply.tier.kind,
                    model = %reply.model,
                    degraded = reply.degraded(),
                    "Chat answered"
                );
                (ChatRole::Bot, reply.display_text())
            }
            Err(exhausted) => {
                warn!(user_id, failures = exhausted.failures.len(), "Chat failed on every tier");
                (ChatRole::Error, exhausted.user_message())
            }
        };

        Ok(chat_message::insert_message(pool, user_id, role, &reply, &Utc::now().to_rfc3339()).await?)
    }
}
