//! Focus session lifecycle: at most one active session per user, ended
//! sessions become immutable history records.

use chrono::{Duration, NaiveDateTime};
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::focus_session::{CurrentFocusSession, FocusSession};
use crate::repositories::focus_session as repo;
use crate::types::UserId;

#[derive(Debug, thiserror::Error)]
pub enum FocusError {
    #[error("No active focus session")]
    NoActiveSession,
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

impl From<FocusError> for AppError {
    fn from(err: FocusError) -> Self {
        match err {
            FocusError::NoActiveSession => {
                AppError::Conflict("No active focus session".to_string())
            }
            FocusError::Db(e) => e.into(),
        }
    }
}

/// Whole elapsed minutes, truncated. A session ended within its first minute
/// records a duration of 0.
pub fn duration_minutes(start: NaiveDateTime, end: NaiveDateTime) -> i32 {
    ((end - start).num_seconds().max(0) / 60) as i32
}

/// Starts a timed session. An already-active session for the user is silently
/// replaced, not archived; the upsert makes the replacement atomic.
pub async fn start_focus(
    pool: &PgPool,
    user_id: UserId,
    subject: &str,
    now: NaiveDateTime,
) -> Result<CurrentFocusSession, FocusError> {
    let current = repo::upsert_current(pool, user_id, subject, now).await?;
    tracing::debug!(user_id = %user_id, subject, "focus session started");
    Ok(current)
}

/// Ends the active session: one history row appended, the active row removed,
/// both inside a single transaction. The deletion doubles as the guard
/// against two racing `end` calls archiving the same session twice.
pub async fn end_focus(
    pool: &PgPool,
    user_id: UserId,
    now: NaiveDateTime,
) -> Result<(FocusSession, i32), FocusError> {
    let current = repo::find_current(pool, user_id)
        .await?
        .ok_or(FocusError::NoActiveSession)?;

    let duration = duration_minutes(current.start_time, now);

    let mut tx = pool.begin().await.map_err(FocusError::Db)?;
    let deleted = repo::delete_current(&mut *tx, user_id).await?;
    if deleted == 0 {
        tx.rollback().await.map_err(FocusError::Db)?;
        return Err(FocusError::NoActiveSession);
    }
    let record = repo::insert_history(
        &mut *tx,
        user_id,
        &current.subject,
        now.date(),
        current.start_time,
        now,
        duration,
    )
    .await?;
    tx.commit().await.map_err(FocusError::Db)?;

    tracing::debug!(user_id = %user_id, duration, "focus session ended");
    Ok((record, duration))
}

/// Read-only snapshot of the active session, if any.
pub async fn get_current(
    pool: &PgPool,
    user_id: UserId,
) -> Result<Option<CurrentFocusSession>, sqlx::Error> {
    repo::find_current(pool, user_id).await
}

/// Deletes active sessions started more than `max_age_hours` before `now`.
/// Runs at process startup and from the `focus_cleanup` binary.
pub async fn cleanup_stale(
    pool: &PgPool,
    now: NaiveDateTime,
    max_age_hours: i64,
) -> Result<u64, sqlx::Error> {
    let cutoff = now - Duration::hours(max_age_hours);
    let reaped = repo::delete_stale_current(pool, cutoff).await?;
    if reaped > 0 {
        tracing::info!(reaped, "removed stale focus sessions");
    }
    Ok(reaped)
}
