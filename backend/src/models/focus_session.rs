use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::types::{FocusSessionId, UserId};

/// An actually executed, timed study interval. Rows are append-only history;
/// nothing ever updates them after creation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FocusSession {
    pub id: FocusSessionId,
    pub user_id: UserId,
    pub subject: String,
    pub date: NaiveDate,
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    /// Whole minutes, truncated.
    pub duration: i32,
    pub created_at: NaiveDateTime,
}

/// The in-progress half of the focus lifecycle. At most one row per user,
/// enforced by a unique constraint on `user_id`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CurrentFocusSession {
    pub id: i64,
    pub user_id: UserId,
    pub subject: String,
    pub start_time: NaiveDateTime,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StartFocusPayload {
    #[validate(length(min = 1, max = 100))]
    pub subject: String,
}

/// History wire format. These field names stay snake_case; the timer UI
/// predates the camelCase planner contract.
#[derive(Debug, Serialize)]
pub struct FocusSessionResponse {
    pub id: FocusSessionId,
    pub subject: String,
    pub date: NaiveDate,
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    pub duration: i32,
}

impl From<FocusSession> for FocusSessionResponse {
    fn from(record: FocusSession) -> Self {
        Self {
            id: record.id,
            subject: record.subject,
            date: record.date,
            start_time: record.start_time,
            end_time: record.end_time,
            duration: record.duration,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CurrentFocusResponse {
    pub start_time: NaiveDateTime,
    pub subject: String,
}

impl From<CurrentFocusSession> for CurrentFocusResponse {
    fn from(current: CurrentFocusSession) -> Self {
        Self {
            start_time: current.start_time,
            subject: current.subject,
        }
    }
}

/// Envelope for `GET /api/focus/current`.
#[derive(Debug, Serialize)]
pub struct CurrentFocusStatus {
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<CurrentFocusResponse>,
}

/// Envelope for `POST /api/focus/end`.
#[derive(Debug, Serialize)]
pub struct EndFocusResponse {
    pub session: FocusSessionResponse,
    pub duration: i32,
}
