use axum::{
    extract::{Query, State},
    Json,
};
use validator::Validate;

use crate::config::Config;
use crate::db::connection::DbPool;
use crate::error::AppError;
use crate::models::focus_session::{
    CurrentFocusResponse, CurrentFocusStatus, EndFocusResponse, FocusSessionResponse,
    StartFocusPayload,
};
use crate::repositories::focus_session as focus_repo;
use crate::services::focus;
use crate::utils::time;

use super::{ensure_user, UserScope};

pub async fn start_focus(
    State((pool, config)): State<(DbPool, Config)>,
    Query(scope): Query<UserScope>,
    Json(payload): Json<StartFocusPayload>,
) -> Result<Json<CurrentFocusResponse>, AppError> {
    payload.validate()?;
    let user_id = scope.user_id();
    ensure_user(&pool, user_id).await?;

    let now = time::now_local(&config.time_zone);
    let current = focus::start_focus(&pool, user_id, &payload.subject, now).await?;
    Ok(Json(current.into()))
}

pub async fn end_focus(
    State((pool, config)): State<(DbPool, Config)>,
    Query(scope): Query<UserScope>,
) -> Result<Json<EndFocusResponse>, AppError> {
    let now = time::now_local(&config.time_zone);
    let (record, duration) = focus::end_focus(&pool, scope.user_id(), now).await?;
    Ok(Json(EndFocusResponse {
        session: record.into(),
        duration,
    }))
}

pub async fn get_current_focus(
    State((pool, _config)): State<(DbPool, Config)>,
    Query(scope): Query<UserScope>,
) -> Result<Json<CurrentFocusStatus>, AppError> {
    let current = focus::get_current(&pool, scope.user_id()).await?;
    Ok(Json(CurrentFocusStatus {
        active: current.is_some(),
        session: current.map(CurrentFocusResponse::from),
    }))
}

pub async fn get_focus_history(
    State((pool, _config)): State<(DbPool, Config)>,
    Query(scope): Query<UserScope>,
) -> Result<Json<Vec<FocusSessionResponse>>, AppError> {
    let history = focus_repo::list_history(&pool, scope.user_id()).await?;
    Ok(Json(
        history.into_iter().map(FocusSessionResponse::from).collect(),
    ))
}
