use chrono::{NaiveDate, NaiveDateTime};
use sqlx::{PgExecutor, PgPool};

use crate::models::focus_session::{CurrentFocusSession, FocusSession};
use crate::types::UserId;

const CURRENT_COLUMNS: &str = "id, user_id, subject, start_time, created_at";
const HISTORY_COLUMNS: &str =
    "id, user_id, subject, date, start_time, end_time, duration, created_at";

/// Starts a session by replacing any existing active row in a single
/// statement. The unique constraint on `user_id` turns two racing starts into
/// one winner instead of two rows.
pub async fn upsert_current(
    pool: &PgPool,
    user_id: UserId,
    subject: &str,
    start_time: NaiveDateTime,
) -> Result<CurrentFocusSession, sqlx::Error> {
    sqlx::query_as::<_, CurrentFocusSession>(&format!(
        "INSERT INTO current_focus_session (user_id, subject, start_time) \
         VALUES ($1, $2, $3) \
         ON CONFLICT (user_id) \
         DO UPDATE SET subject = EXCLUDED.subject, start_time = EXCLUDED.start_time \
         RETURNING {CURRENT_COLUMNS}"
    ))
    .bind(user_id)
    .bind(subject)
    .bind(start_time)
    .fetch_one(pool)
    .await
}

pub async fn find_current(
    pool: &PgPool,
    user_id: UserId,
) -> Result<Option<CurrentFocusSession>, sqlx::Error> {
    sqlx::query_as::<_, CurrentFocusSession>(&format!(
        "SELECT {CURRENT_COLUMNS} FROM current_focus_session WHERE user_id = $1"
    ))
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub async fn delete_current(
    executor: impl PgExecutor<'_>,
    user_id: UserId,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM current_focus_session WHERE user_id = $1")
        .bind(user_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

pub async fn insert_history(
    executor: impl PgExecutor<'_>,
    user_id: UserId,
    subject: &str,
    date: NaiveDate,
    start_time: NaiveDateTime,
    end_time: NaiveDateTime,
    duration: i32,
) -> Result<FocusSession, sqlx::Error> {
    sqlx::query_as::<_, FocusSession>(&format!(
        "INSERT INTO focus_sessions (user_id, subject, date, start_time, end_time, duration) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING {HISTORY_COLUMNS}"
    ))
    .bind(user_id)
    .bind(subject)
    .bind(date)
    .bind(start_time)
    .bind(end_time)
    .bind(duration)
    .fetch_one(executor)
    .await
}

pub async fn list_history(
    pool: &PgPool,
    user_id: UserId,
) -> Result<Vec<FocusSession>, sqlx::Error> {
    sqlx::query_as::<_, FocusSession>(&format!(
        "SELECT {HISTORY_COLUMNS} FROM focus_sessions WHERE user_id = $1 \
         ORDER BY start_time DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn list_history_between(
    pool: &PgPool,
    user_id: UserId,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<FocusSession>, sqlx::Error> {
    sqlx::query_as::<_, FocusSession>(&format!(
        "SELECT {HISTORY_COLUMNS} FROM focus_sessions \
         WHERE user_id = $1 AND date BETWEEN $2 AND $3 \
         ORDER BY date, start_time"
    ))
    .bind(user_id)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await
}

/// Reaps abandoned active sessions across all users. No history record is
/// written; an abandoned session is lost, not archived.
pub async fn delete_stale_current(
    pool: &PgPool,
    cutoff: NaiveDateTime,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM current_focus_session WHERE start_time < $1")
        .bind(cutoff)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
