//! Login activity log.

use sqlx::{Executor, Sqlite, SqlitePool};

use crate::models::ActivityRecord;
use crate::Result;

/// Append a login event.
///
/// Takes any executor so the streak update can append inside its transaction.
pub async fn append_activity<'e, E>(
    executor: E,
    user_id: &str,
    login_date: &str,
    timestamp: &str,
) -> Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO user_activity (user_id, login_date, timestamp)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(login_date)
    .bind(timestamp)
    .execute(executor)
    .await?;

    Ok(result.last_insert_rowid())
}

/// List a user's most recent login events, newest first.
pub async fn list_activity(
    pool: &SqlitePool,
    user_id: &str,
    limit: i64,
) -> Result<Vec<ActivityRecord>> {
    let rows = sqlx::query_as::<_, ActivityRecord>(
        r#"
        SELECT id, user_id, login_date, timestamp
        FROM user_activity
        WHERE user_id = ?
        ORDER BY id DESC
        LIMIT ?
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Count all login events for a user.
pub async fn count_activity(pool: &SqlitePool, user_id: &str) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM user_activity WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    async fn test_db() -> Database {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.migrate().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_append_and_list_newest_first() {
        let db = test_db().await;
        append_activity(db.pool(), "u1", "2024-01-01", "2024-01-01T09:00:00+00:00")
            .await
            .unwrap();
        append_activity(db.pool(), "u1", "2024-01-02", "2024-01-02T09:00:00+00:00")
            .await
            .unwrap();
        append_activity(db.pool(), "u2", "2024-01-02", "2024-01-02T10:00:00+00:00")
            .await
            .unwrap();

        let rows = list_activity(db.pool(), "u1", 10).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].login_date, "2024-01-02");
        assert_eq!(rows[1].login_date, "2024-01-01");

        let limited = list_activity(db.pool(), "u1", 1).await.unwrap();
        assert_eq!(limited.len(), 1);

        assert_eq!(count_activity(db.pool(), "u2").await.unwrap(), 1);
    }
}
