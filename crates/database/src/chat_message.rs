//! Chat message storage.

use sqlx::SqlitePool;

use crate::models::{ChatMessage, ChatRole};
use crate::Result;

/// Insert a chat message and return the stored row.
pub async fn insert_message(
    pool: &SqlitePool,
    user_id: &str,
    role: ChatRole,
    text: &str,
    timestamp: &str,
) -> Result<ChatMessage> {
    let result = sqlx::query(
        r#"
        INSERT INTO chat_messages (user_id, role, text, timestamp)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(role.as_str())
    .bind(text)
    .bind(timestamp)
    .execute(pool)
    .await?;

    Ok(ChatMessage {
        id: result.last_insert_rowid(),
        user_id: user_id.to_string(),
        role: role.as_str().to_string(),
        text: text.to_string(),
        timestamp: timestamp.to_string(),
    })
}

/// List a user's messages, oldest first.
pub async fn list_messages(pool: &SqlitePool, user_id: &str) -> Result<Vec<ChatMessage>> {
    let rows = sqlx::query_as::<_, ChatMessage>(
        r#"
        SELECT id, user_id, role, text, timestamp
        FROM chat_messages
        WHERE user_id = ?
        ORDER BY timestamp ASC, id ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Delete every message owned by a user.
///
/// Returns the number of deleted messages.
pub async fn clear_messages(pool: &SqlitePool, user_id: &str) -> Result<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM chat_messages
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
