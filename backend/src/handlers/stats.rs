use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::config::Config;
use crate::db::connection::DbPool;
use crate::error::AppError;
use crate::repositories::{focus_session as focus_repo, study_session as session_repo, task as task_repo};
use crate::services::stats::{self, DashboardStats, MissedMatchPolicy, ProgressStats};
use crate::types::{UserId, DEFAULT_USER_ID};
use crate::utils::time;

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub user_id: Option<i64>,
    /// Missed-session matching: `title` (compatibility, default) compares a
    /// planned session's title to history subjects, `subject` compares its
    /// subject field.
    pub missed_match: Option<String>,
}

impl DashboardQuery {
    fn policy(&self) -> Result<MissedMatchPolicy, AppError> {
        match self.missed_match.as_deref() {
            None | Some("title") => Ok(MissedMatchPolicy::PlannedTitle),
            Some("subject") => Ok(MissedMatchPolicy::PlannedSubject),
            Some(other) => Err(AppError::BadRequest(format!(
                "unknown missed_match value '{}'",
                other
            ))),
        }
    }
}

pub async fn get_dashboard_stats(
    State((pool, config)): State<(DbPool, Config)>,
    Query(params): Query<DashboardQuery>,
) -> Result<Json<DashboardStats>, AppError> {
    let user_id = params.user_id.map(UserId).unwrap_or(DEFAULT_USER_ID);
    let policy = params.policy()?;
    let now = time::now_local(&config.time_zone);

    let tasks = task_repo::list_tasks(&pool, user_id).await?;
    let planned_today = session_repo::list_for_date(&pool, user_id, now.date()).await?;
    let history = focus_repo::list_history(&pool, user_id).await?;

    Ok(Json(stats::dashboard_stats(
        &tasks,
        &planned_today,
        &history,
        now,
        policy,
    )))
}

pub async fn get_progress_stats(
    State((pool, config)): State<(DbPool, Config)>,
    Query(scope): Query<super::UserScope>,
) -> Result<Json<ProgressStats>, AppError> {
    let user_id = scope.user_id();
    let today = time::today_local(&config.time_zone);

    let tasks = task_repo::list_tasks(&pool, user_id).await?;
    let history = focus_repo::list_history(&pool, user_id).await?;

    Ok(Json(stats::progress_stats(&tasks, &history, today)))
}
