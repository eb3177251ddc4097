//! Input validation for studio requests.

use crate::error::{Result, StudioError};

/// Maximum length for identity-provider user ids.
pub const MAX_USER_ID_LENGTH: usize = 128;

/// Maximum length for image prompts.
pub const MAX_PROMPT_LENGTH: usize = 2000;

/// Maximum length for a chat message.
pub const MAX_MESSAGE_LENGTH: usize = 4000;

/// Check a required text field and return it trimmed.
pub fn required<'a>(field: &str, value: &'a str, max: usize) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StudioError::Validation(format!("{} cannot be empty", field)));
    }

    let actual = trimmed.chars().count();
    if actual > max {
        return Err(StudioError::Validation(format!(
            "{} is too long ({} chars, max {})",
            field, actual, max
        )));
    }

    Ok(trimmed)
}

pub fn user_id(value: &str) -> Result<&str> {
    required("user id", value, MAX_USER_ID_LENGTH)
}

pub fn chat_text(value: &str) -> Result<&str> {
    required("message", value, MAX_MESSAGE_LENGTH)
}

/// Check an image reference sent along with a chat message.
///
/// Accepts `http(s)://` URLs and `data:image/...` URLs. Blank means none.
pub fn image_url(value: Option<&str>) -> Result<Option<&str>> {
    let Some(url) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    if url.starts_with("https://") || url.starts_with("http://") || url.starts_with("data:image/") {
        Ok(Some(url))
    } else {
        Err(StudioError::Validation(
            "image url must be an http(s) or data:image URL".to_string(),
        ))
    }
}
