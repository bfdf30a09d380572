use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::config::Config;
use crate::db::connection::DbPool;
use crate::error::AppError;
use crate::models::study_session::{StudySessionPayload, StudySessionResponse};
use crate::repositories::study_session as session_repo;
use crate::types::{StudySessionId, UserId, DEFAULT_USER_ID};
use crate::utils::time;

use super::ensure_user;

#[derive(Debug, Deserialize)]
pub struct SessionListQuery {
    pub user_id: Option<i64>,
    pub date: Option<NaiveDate>,
}

pub async fn list_sessions(
    State((pool, _config)): State<(DbPool, Config)>,
    Query(params): Query<SessionListQuery>,
) -> Result<Json<Vec<StudySessionResponse>>, AppError> {
    let user_id = params.user_id.map(UserId).unwrap_or(DEFAULT_USER_ID);
    let sessions = session_repo::list_sessions(&pool, user_id, params.date).await?;
    Ok(Json(
        sessions.into_iter().map(StudySessionResponse::from).collect(),
    ))
}

pub async fn create_session(
    State((pool, config)): State<(DbPool, Config)>,
    Query(scope): Query<super::UserScope>,
    Json(payload): Json<StudySessionPayload>,
) -> Result<(StatusCode, Json<StudySessionResponse>), AppError> {
    let user_id = scope.user_id();
    let times = payload.parse_times()?;
    ensure_user(&pool, user_id).await?;

    let now = time::now_local(&config.time_zone);
    let session = session_repo::create_session(&pool, user_id, &payload, &times, now).await?;
    Ok((StatusCode::CREATED, Json(session.into())))
}

pub async fn update_session(
    State((pool, config)): State<(DbPool, Config)>,
    Path(session_id): Path<i64>,
    Query(scope): Query<super::UserScope>,
    Json(payload): Json<StudySessionPayload>,
) -> Result<Json<StudySessionResponse>, AppError> {
    let user_id = scope.user_id();
    let times = payload.parse_times()?;

    let now = time::now_local(&config.time_zone);
    let updated = session_repo::update_session(
        &pool,
        StudySessionId(session_id),
        user_id,
        &payload,
        &times,
        now,
    )
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Session {} not found", session_id)))?;

    Ok(Json(updated.into()))
}

/// Idempotent: deleting a session that is already gone succeeds.
pub async fn delete_session(
    State((pool, _config)): State<(DbPool, Config)>,
    Path(session_id): Path<i64>,
    Query(scope): Query<super::UserScope>,
) -> Result<StatusCode, AppError> {
    session_repo::delete_session(&pool, StudySessionId(session_id), scope.user_id()).await?;
    Ok(StatusCode::NO_CONTENT)
}
