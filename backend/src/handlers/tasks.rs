use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::config::Config;
use crate::db::connection::DbPool;
use crate::error::AppError;
use crate::models::task::{TaskPayload, TaskResponse};
use crate::repositories::task as task_repo;
use crate::types::TaskId;
use crate::utils::time;

use super::{ensure_user, UserScope};

pub async fn list_tasks(
    State((pool, config)): State<(DbPool, Config)>,
    Query(scope): Query<UserScope>,
) -> Result<Json<Vec<TaskResponse>>, AppError> {
    let today = time::today_local(&config.time_zone);
    let tasks = task_repo::list_tasks(&pool, scope.user_id()).await?;
    Ok(Json(
        tasks
            .into_iter()
            .map(|task| TaskResponse::from_task(task, today))
            .collect(),
    ))
}

pub async fn create_task(
    State((pool, config)): State<(DbPool, Config)>,
    Query(scope): Query<UserScope>,
    Json(payload): Json<TaskPayload>,
) -> Result<(StatusCode, Json<TaskResponse>), AppError> {
    let user_id = scope.user_id();
    let due_date = payload.parse_due_date()?;
    ensure_user(&pool, user_id).await?;

    let now = time::now_local(&config.time_zone);
    let task = task_repo::create_task(&pool, user_id, &payload.title, due_date, now).await?;
    let today = time::today_local(&config.time_zone);
    Ok((StatusCode::CREATED, Json(TaskResponse::from_task(task, today))))
}

pub async fn toggle_task(
    State((pool, config)): State<(DbPool, Config)>,
    Path(task_id): Path<i64>,
    Query(scope): Query<UserScope>,
) -> Result<Json<TaskResponse>, AppError> {
    let now = time::now_local(&config.time_zone);
    let task = task_repo::toggle_task(&pool, TaskId(task_id), scope.user_id(), now)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Task {} not found", task_id)))?;
    Ok(Json(TaskResponse::from_task(
        task,
        time::today_local(&config.time_zone),
    )))
}

/// Idempotent: deleting a task that is already gone succeeds.
pub async fn delete_task(
    State((pool, _config)): State<(DbPool, Config)>,
    Path(task_id): Path<i64>,
    Query(scope): Query<UserScope>,
) -> Result<StatusCode, AppError> {
    task_repo::delete_task(&pool, TaskId(task_id), scope.user_id()).await?;
    Ok(StatusCode::NO_CONTENT)
}
