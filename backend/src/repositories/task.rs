use chrono::{NaiveDate, NaiveDateTime};
use sqlx::PgPool;

use crate::models::task::Task;
use crate::types::{TaskId, UserId};

const COLUMNS: &str = "id, user_id, title, due_date, completed, created_at, updated_at";

pub async fn list_tasks(pool: &PgPool, user_id: UserId) -> Result<Vec<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>(&format!(
        "SELECT {COLUMNS} FROM tasks WHERE user_id = $1 ORDER BY due_date, id"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn create_task(
    pool: &PgPool,
    user_id: UserId,
    title: &str,
    due_date: NaiveDate,
    now: NaiveDateTime,
) -> Result<Task, sqlx::Error> {
    sqlx::query_as::<_, Task>(&format!(
        "INSERT INTO tasks (user_id, title, due_date, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $4) \
         RETURNING {COLUMNS}"
    ))
    .bind(user_id)
    .bind(title)
    .bind(due_date)
    .bind(now)
    .fetch_one(pool)
    .await
}

/// Flips the completed flag. Returns `None` when no such task exists for the
/// user, which handlers report as not-found.
pub async fn toggle_task(
    pool: &PgPool,
    task_id: TaskId,
    user_id: UserId,
    now: NaiveDateTime,
) -> Result<Option<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>(&format!(
        "UPDATE tasks SET completed = NOT completed, updated_at = $3 \
         WHERE id = $1 AND user_id = $2 \
         RETURNING {COLUMNS}"
    ))
    .bind(task_id)
    .bind(user_id)
    .bind(now)
    .fetch_optional(pool)
    .await
}

pub async fn delete_task(
    pool: &PgPool,
    task_id: TaskId,
    user_id: UserId,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
        .bind(task_id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn list_due_between(
    pool: &PgPool,
    user_id: UserId,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>(&format!(
        "SELECT {COLUMNS} FROM tasks \
         WHERE user_id = $1 AND due_date BETWEEN $2 AND $3 \
         ORDER BY due_date, id"
    ))
    .bind(user_id)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await
}

pub async fn list_overdue(
    pool: &PgPool,
    user_id: UserId,
    today: NaiveDate,
) -> Result<Vec<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>(&format!(
        "SELECT {COLUMNS} FROM tasks \
         WHERE user_id = $1 AND due_date < $2 AND completed = FALSE \
         ORDER BY due_date, id"
    ))
    .bind(user_id)
    .bind(today)
    .fetch_all(pool)
    .await
}
