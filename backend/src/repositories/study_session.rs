use chrono::{NaiveDate, NaiveDateTime};
use sqlx::PgPool;

use crate::models::study_session::{SessionTimes, StudySession, StudySessionPayload};
use crate::types::{StudySessionId, UserId};

const COLUMNS: &str =
    "id, user_id, title, subject, date, start_time, end_time, color, priority, notes, \
     created_at, updated_at";

pub async fn list_sessions(
    pool: &PgPool,
    user_id: UserId,
    date: Option<NaiveDate>,
) -> Result<Vec<StudySession>, sqlx::Error> {
    match date {
        Some(date) => list_for_date(pool, user_id, date).await,
        None => {
            sqlx::query_as::<_, StudySession>(&format!(
                "SELECT {COLUMNS} FROM study_sessions WHERE user_id = $1 \
                 ORDER BY date, start_time"
            ))
            .bind(user_id)
            .fetch_all(pool)
            .await
        }
    }
}

pub async fn list_for_date(
    pool: &PgPool,
    user_id: UserId,
    date: NaiveDate,
) -> Result<Vec<StudySession>, sqlx::Error> {
    sqlx::query_as::<_, StudySession>(&format!(
        "SELECT {COLUMNS} FROM study_sessions WHERE user_id = $1 AND date = $2 \
         ORDER BY start_time"
    ))
    .bind(user_id)
    .bind(date)
    .fetch_all(pool)
    .await
}

pub async fn list_between(
    pool: &PgPool,
    user_id: UserId,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<StudySession>, sqlx::Error> {
    sqlx::query_as::<_, StudySession>(&format!(
        "SELECT {COLUMNS} FROM study_sessions \
         WHERE user_id = $1 AND date BETWEEN $2 AND $3 \
         ORDER BY date, start_time"
    ))
    .bind(user_id)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await
}

pub async fn create_session(
    pool: &PgPool,
    user_id: UserId,
    payload: &StudySessionPayload,
    times: &SessionTimes,
    now: NaiveDateTime,
) -> Result<StudySession, sqlx::Error> {
    sqlx::query_as::<_, StudySession>(&format!(
        "INSERT INTO study_sessions \
             (user_id, title, subject, date, start_time, end_time, color, priority, notes, \
              created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10) \
         RETURNING {COLUMNS}"
    ))
    .bind(user_id)
    .bind(&payload.title)
    .bind(&payload.subject)
    .bind(times.date)
    .bind(times.start_time)
    .bind(times.end_time)
    .bind(&payload.color)
    .bind(&payload.priority)
    .bind(&payload.notes)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn update_session(
    pool: &PgPool,
    session_id: StudySessionId,
    user_id: UserId,
    payload: &StudySessionPayload,
    times: &SessionTimes,
    now: NaiveDateTime,
) -> Result<Option<StudySession>, sqlx::Error> {
    sqlx::query_as::<_, StudySession>(&format!(
        "UPDATE study_sessions \
         SET title = $3, subject = $4, date = $5, start_time = $6, end_time = $7, \
             color = $8, priority = $9, notes = $10, updated_at = $11 \
         WHERE id = $1 AND user_id = $2 \
         RETURNING {COLUMNS}"
    ))
    .bind(session_id)
    .bind(user_id)
    .bind(&payload.title)
    .bind(&payload.subject)
    .bind(times.date)
    .bind(times.start_time)
    .bind(times.end_time)
    .bind(&payload.color)
    .bind(&payload.priority)
    .bind(&payload.notes)
    .bind(now)
    .fetch_optional(pool)
    .await
}

pub async fn delete_session(
    pool: &PgPool,
    session_id: StudySessionId,
    user_id: UserId,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM study_sessions WHERE id = $1 AND user_id = $2")
        .bind(session_id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
