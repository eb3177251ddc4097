//! Login-streak bookkeeping.
//!
//! Login days are UTC calendar dates. The read-modify-write runs inside a
//! transaction and the profile update is a compare-and-set against the
//! values that were read, so two racing logins for the same user cannot
//! both extend the streak from the same starting point.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::activity;
use crate::error::{DatabaseError, Result};
use crate::models::UserProfile;

/// Date format used for `last_login_date` and `login_date`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Compare-and-set attempts before giving up with [`DatabaseError::Conflict`].
const MAX_ATTEMPTS: usize = 3;

/// Result of recording a login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginOutcome {
    /// Current streak after the login.
    pub streak: i64,
    /// False when the user had already logged in today.
    pub is_new_day: bool,
}

/// The streak fields of a profile, with the date parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakState {
    pub current_streak: i64,
    pub longest_streak: i64,
    pub last_login_date: NaiveDate,
}

impl StreakState {
    /// Extract the streak state from a stored profile.
    pub fn from_profile(profile: &UserProfile) -> Result<Self> {
        let last_login_date = NaiveDate::parse_from_str(&profile.last_login_date, DATE_FORMAT)
            .map_err(|e| DatabaseError::InvalidData {
                entity: "UserProfile",
                detail: format!(
                    "last_login_date {:?} for {}: {}",
                    profile.last_login_date, profile.user_id, e
                ),
            })?;

        Ok(Self {
            current_streak: profile.current_streak,
            longest_streak: profile.longest_streak,
            last_login_date,
        })
    }
}

/// What a login on `today` does to a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakDecision {
    /// No profile yet: start a streak of 1.
    Start,
    /// Already counted for today (or the stored day is ahead of today).
    Unchanged { streak: i64 },
    /// Replace `from` with a new streak for today.
    Advance {
        from: StreakState,
        current: i64,
        longest: i64,
    },
}

/// Decide the streak transition for a login on `today`.
pub fn next_streak(state: Option<&StreakState>, today: NaiveDate) -> StreakDecision {
    let Some(state) = state else {
        return StreakDecision::Start;
    };

    // last_login_date never moves backwards
    if state.last_login_date >= today {
        return StreakDecision::Unchanged {
            streak: state.current_streak,
        };
    }

    let current = if today.pred_opt() == Some(state.last_login_date) {
        state.current_streak + 1
    } else {
        1
    };

    StreakDecision::Advance {
        from: *state,
        current,
        longest: current.max(state.longest_streak),
    }
}

/// Format a date the way it is stored.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Record a login for `user_id` at `now`.
///
/// Creates the profile on first login, extends or resets the streak on a
/// new day, and appends one activity record per counted login. A repeat
/// login on the same UTC day changes nothing.
pub async fn record_login(
    pool: &SqlitePool,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<LoginOutcome> {
    for attempt in 1..=MAX_ATTEMPTS {
        match try_record_login(pool, user_id, now).await {
            Ok(Some(outcome)) => return Ok(outcome),
            Ok(None) => debug!(user_id, attempt, "Profile changed concurrently, re-reading"),
            Err(DatabaseError::Sqlx(e)) if is_busy(&e) => {
                debug!(user_id, attempt, "Database busy, retrying login: {}", e)
            }
            Err(e) => return Err(e),
        }
    }

    Err(DatabaseError::Conflict {
        entity: "UserProfile",
        id: user_id.to_string(),
    })
}

/// SQLITE_BUSY or SQLITE_BUSY_SNAPSHOT.
fn is_busy(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|e| e.code())
        .is_some_and(|code| code == "5" || code == "517")
}

/// One read-decide-write pass. `None` means the compare-and-set lost.
async fn try_record_login(
    pool: &SqlitePool,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<Option<LoginOutcome>> {
    let today = now.date_naive();
    let today_str = format_date(today);
    let timestamp = now.to_rfc3339();

    // Take the write lock up front so concurrent logins queue on the busy
    // timeout instead of failing when a read lock is upgraded.
    let mut tx = pool.begin_with("BEGIN IMMEDIATE").await?;

    let existing = sqlx::query_as::<_, UserProfile>(
        r#"
        SELECT user_id, current_streak, longest_streak, last_login_date, total_images, created_at
        FROM user_profiles
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(&mut *tx)
    .await?;

    let state = existing
        .as_ref()
        .map(StreakState::from_profile)
        .transpose()?;

    let (streak, written) = match next_streak(state.as_ref(), today) {
        StreakDecision::Unchanged { streak } => {
            tx.rollback().await?;
            debug!(user_id, streak, "Login already counted today");
            return Ok(Some(LoginOutcome {
                streak,
                is_new_day: false,
            }));
        }
        StreakDecision::Start => {
            let result = sqlx::query(
                r#"
                INSERT INTO user_profiles
                    (user_id, current_streak, longest_streak, last_login_date, total_images, created_at)
                VALUES (?, 1, 1, ?, 0, ?)
                ON CONFLICT(user_id) DO NOTHING
                "#,
            )
            .bind(user_id)
            .bind(&today_str)
            .bind(&timestamp)
            .execute(&mut *tx)
            .await?;

            (1, result.rows_affected() > 0)
        }
        StreakDecision::Advance {
            from: prev,
            current,
            longest,
        } => {
            let result = sqlx::query(
                r#"
                UPDATE user_profiles
                SET current_streak = ?, longest_streak = ?, last_login_date = ?
                WHERE user_id = ? AND current_streak = ? AND last_login_date = ?
                "#,
            )
            .bind(current)
            .bind(longest)
            .bind(&today_str)
            .bind(user_id)
            .bind(prev.current_streak)
            .bind(format_date(prev.last_login_date))
            .execute(&mut *tx)
            .await?;

            (current, result.rows_affected() > 0)
        }
    };

    if !written {
        tx.rollback().await?;
        return Ok(None);
    }

    activity::append_activity(&mut *tx, user_id, &today_str, &timestamp).await?;
    tx.commit().await?;

    info!(user_id, streak, date = %today_str, "Recorded login");
    Ok(Some(LoginOutcome {
        streak,
        is_new_day: true,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{user_profile, Database};
    use chrono::TimeZone;

    async fn test_db() -> Database {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.migrate().await.unwrap();
        db
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_next_streak_start() {
        assert_eq!(next_streak(None, date(2024, 1, 1)), StreakDecision::Start);
    }

    #[test]
    fn test_next_streak_transitions() {
        let state = StreakState {
            current_streak: 4,
            longest_streak: 6,
            last_login_date: date(2024, 2, 28),
        };

        assert_eq!(
            next_streak(Some(&state), date(2024, 2, 28)),
            StreakDecision::Unchanged { streak: 4 }
        );
        assert_eq!(
            next_streak(Some(&state), date(2024, 2, 29)),
            StreakDecision::Advance {
                from: state,
                current: 5,
                longest: 6
            }
        );
        assert_eq!(
            next_streak(Some(&state), date(2024, 3, 1)),
            StreakDecision::Advance {
                from: state,
                current: 1,
                longest: 6
            }
        );
    }

    #[test]
    fn test_next_streak_raises_longest() {
        let state = StreakState {
            current_streak: 6,
            longest_streak: 6,
            last_login_date: date(2023, 12, 31),
        };
        assert_eq!(
            next_streak(Some(&state), date(2024, 1, 1)),
            StreakDecision::Advance {
                from: state,
                current: 7,
                longest: 7
            }
        );
    }

    #[test]
    fn test_next_streak_never_moves_date_backwards() {
        let state = StreakState {
            current_streak: 2,
            longest_streak: 3,
            last_login_date: date(2024, 5, 10),
        };
        assert_eq!(
            next_streak(Some(&state), date(2024, 5, 9)),
            StreakDecision::Unchanged { streak: 2 }
        );
    }

    #[tokio::test]
    async fn test_streak_scenario() {
        let db = test_db().await;
        let user = "user_2abc";

        // First login
        let outcome = record_login(db.pool(), user, at(2024, 1, 1, 9)).await.unwrap();
        assert_eq!(
            outcome,
            LoginOutcome {
                streak: 1,
                is_new_day: true
            }
        );
        let profile = user_profile::get_profile(db.pool(), user).await.unwrap().unwrap();
        assert_eq!(profile.current_streak, 1);
        assert_eq!(profile.longest_streak, 1);
        assert_eq!(profile.last_login_date, "2024-01-01");
        assert_eq!(profile.total_images, 0);

        // Same day again
        let outcome = record_login(db.pool(), user, at(2024, 1, 1, 22)).await.unwrap();
        assert_eq!(
            outcome,
            LoginOutcome {
                streak: 1,
                is_new_day: false
            }
        );
        let unchanged = user_profile::get_profile(db.pool(), user).await.unwrap().unwrap();
        assert_eq!(unchanged, profile);

        // Next day
        let outcome = record_login(db.pool(), user, at(2024, 1, 2, 7)).await.unwrap();
        assert_eq!(
            outcome,
            LoginOutcome {
                streak: 2,
                is_new_day: true
            }
        );
        let profile = user_profile::get_profile(db.pool(), user).await.unwrap().unwrap();
        assert_eq!(profile.longest_streak, 2);

        // Gap
        let outcome = record_login(db.pool(), user, at(2024, 1, 10, 12)).await.unwrap();
        assert_eq!(
            outcome,
            LoginOutcome {
                streak: 1,
                is_new_day: true
            }
        );
        let profile = user_profile::get_profile(db.pool(), user).await.unwrap().unwrap();
        assert_eq!(profile.current_streak, 1);
        assert_eq!(profile.longest_streak, 2);
        assert_eq!(profile.last_login_date, "2024-01-10");

        // One activity record per counted login
        assert_eq!(activity::count_activity(db.pool(), user).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_longest_never_below_current() {
        let db = test_db().await;
        let user = "user_long";
        let days = [1, 2, 3, 5, 6, 7, 8, 9, 20, 21];

        for day in days {
            record_login(db.pool(), user, at(2024, 3, day, 10)).await.unwrap();
            let profile = user_profile::get_profile(db.pool(), user).await.unwrap().unwrap();
            assert!(profile.longest_streak >= profile.current_streak);
        }

        let profile = user_profile::get_profile(db.pool(), user).await.unwrap().unwrap();
        assert_eq!(profile.current_streak, 2);
        assert_eq!(profile.longest_streak, 5);
    }

    #[tokio::test]
    async fn test_day_boundary_is_utc() {
        let db = test_db().await;
        let user = "user_midnight";

        record_login(db.pool(), user, Utc.with_ymd_and_hms(2024, 6, 1, 23, 59, 0).unwrap())
            .await
            .unwrap();
        let outcome = record_login(db.pool(), user, Utc.with_ymd_and_hms(2024, 6, 2, 0, 1, 0).unwrap())
            .await
            .unwrap();

        assert_eq!(outcome.streak, 2);
        assert!(outcome.is_new_day);
    }

    #[tokio::test]
    async fn test_corrupt_date_is_reported() {
        let db = test_db().await;
        sqlx::query(
            r#"
            INSERT INTO user_profiles
                (user_id, current_streak, longest_streak, last_login_date, total_images, created_at)
            VALUES ('bad', 1, 1, 'yesterday', 0, '2024-01-01T00:00:00+00:00')
            "#,
        )
        .execute(db.pool())
        .await
        .unwrap();

        let result = record_login(db.pool(), "bad", at(2024, 1, 2, 0)).await;
        assert!(matches!(result, Err(DatabaseError::InvalidData { .. })));
    }

    async fn file_db(name: &str) -> (Database, std::path::PathBuf) {
        let path = std::env::temp_dir().join(format!(
            "studio-streak-{}-{}.db",
            name,
            std::process::id()
        ));
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
        }

        let db = Database::connect(&format!("sqlite:{}?mode=rwc", path.display()))
            .await
            .unwrap();
        db.migrate().await.unwrap();
        (db, path)
    }

    async fn login_burst(db: &Database, user: &str, now: DateTime<Utc>, count: usize) -> Vec<LoginOutcome> {
        let handles: Vec<_> = (0..count)
            .map(|_| {
                let pool = db.pool().clone();
                let user = user.to_string();
                tokio::spawn(async move { record_login(&pool, &user, now).await })
            })
            .collect();

        let mut outcomes = Vec::new();
        for handle in handles {
            outcomes.push(handle.await.unwrap().unwrap());
        }
        outcomes
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_logins_count_once() {
        let (db, path) = file_db("burst").await;
        let user = "user_race";

        let first = login_burst(&db, user, at(2024, 1, 1, 9), 16).await;
        assert_eq!(first.iter().filter(|o| o.is_new_day).count(), 1);
        assert!(first.iter().all(|o| o.streak == 1));
        assert_eq!(activity::count_activity(db.pool(), user).await.unwrap(), 1);

        let second = login_burst(&db, user, at(2024, 1, 2, 9), 16).await;
        assert_eq!(second.iter().filter(|o| o.is_new_day).count(), 1);
        assert!(second.iter().all(|o| o.streak == 2));
        assert_eq!(activity::count_activity(db.pool(), user).await.unwrap(), 2);

        let profile = user_profile::get_profile(db.pool(), user).await.unwrap().unwrap();
        assert_eq!(profile.current_streak, 2);
        assert_eq!(profile.longest_streak, 2);

        db.close().await;
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
        }
    }
}
