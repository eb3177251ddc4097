//! User profile storage for streak and gallery counters.

use sqlx::SqlitePool;

use crate::models::UserProfile;
use crate::Result;

/// Get a user's profile.
pub async fn get_profile(pool: &SqlitePool, user_id: &str) -> Result<Option<UserProfile>> {
    let record = sqlx::query_as::<_, UserProfile>(
        r#"
        SELECT user_id, current_streak, longest_streak, last_login_date, total_images, created_at
        FROM user_profiles
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}

/// Increment the saved-image counter.
///
/// Does nothing when the user has no profile yet.
/// Returns true if a profile was updated.
pub async fn increment_image_count(pool: &SqlitePool, user_id: &str) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE user_profiles
        SET total_images = total_images + 1
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
