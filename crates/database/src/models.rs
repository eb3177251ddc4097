//! Database models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Login-streak profile, one per user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    /// Identity-provider user id.
    pub user_id: String,
    /// Consecutive login days ending at `last_login_date`.
    pub current_streak: i64,
    /// Best streak ever observed; never below `current_streak`.
    pub longest_streak: i64,
    /// Last login day as `YYYY-MM-DD` (UTC).
    pub last_login_date: String,
    /// Number of images saved by the user.
    pub total_images: i64,
    /// When the profile was created (RFC 3339).
    pub created_at: String,
}

/// A login event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ActivityRecord {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Owning user.
    pub user_id: String,
    /// Login day as `YYYY-MM-DD` (UTC).
    pub login_date: String,
    /// Exact login instant (RFC 3339).
    pub timestamp: String,
}

/// Author of a stored chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Typed by the user.
    User,
    /// Model reply.
    Bot,
    /// Failure notice shown in place of a reply.
    Error,
}

impl ChatRole {
    /// Column value for this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Bot => "bot",
            ChatRole::Error => "error",
        }
    }
}

/// A stored chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ChatMessage {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Owning user.
    pub user_id: String,
    /// "user", "bot", or "error".
    pub role: String,
    /// Message body.
    pub text: String,
    /// Creation timestamp (RFC 3339).
    pub timestamp: String,
}

/// A generated image saved to the user's gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct GeneratedImage {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Owning user.
    pub user_id: String,
    /// Image URL (remote or `data:` URL).
    pub url: String,
    /// Prompt that produced the image.
    pub prompt: String,
    /// Aspect ratio label, e.g. "16:9".
    pub aspect_ratio: String,
    /// Creation timestamp (RFC 3339).
    pub timestamp: String,
}

/// Fields for inserting a new image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewImage<'a> {
    pub user_id: &'a str,
    pub url: &'a str,
    pub prompt: &'a str,
    pub aspect_ratio: &'a str,
    pub timestamp: &'a str,
}
