//! Gallery image storage.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{GeneratedImage, NewImage};

/// Save a generated image and return the stored row.
pub async fn insert_image(pool: &SqlitePool, image: &NewImage<'_>) -> Result<GeneratedImage> {
    let result = sqlx::query(
        r#"
        INSERT INTO images (user_id, url, prompt, aspect_ratio, timestamp)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(image.user_id)
    .bind(image.url)
    .bind(image.prompt)
    .bind(image.aspect_ratio)
    .bind(image.timestamp)
    .execute(pool)
    .await?;

    Ok(GeneratedImage {
        id: result.last_insert_rowid(),
        user_id: image.user_id.to_string(),
        url: image.url.to_string(),
        prompt: image.prompt.to_string(),
        aspect_ratio: image.aspect_ratio.to_string(),
        timestamp: image.timestamp.to_string(),
    })
}

/// List a user's images, newest first.
pub async fn list_images(pool: &SqlitePool, user_id: &str) -> Result<Vec<GeneratedImage>> {
    let rows = sqlx::query_as::<_, GeneratedImage>(
        r#"
        SELECT id, user_id, url, prompt, aspect_ratio, timestamp
        FROM images
        WHERE user_id = ?
        ORDER BY timestamp DESC, id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Delete an image owned by `user_id`.
///
/// An image belonging to someone else is reported as not found.
pub async fn delete_image(pool: &SqlitePool, user_id: &str, id: i64) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM images
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Image",
            id: id.to_string(),
        });
    }

    Ok(())
}
