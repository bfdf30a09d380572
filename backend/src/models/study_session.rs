use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::error::AppError;
use crate::types::{StudySessionId, UserId};
use crate::utils::time;
use crate::validation::rules;

/// A planned block of study time. Planned sessions never transition on their
/// own; they are created, edited and deleted through the planner.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StudySession {
    pub id: StudySessionId,
    pub user_id: UserId,
    pub title: String,
    pub subject: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub color: String,
    pub priority: String,
    pub notes: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Create/update payload. Date and clock fields arrive as strings from the
/// planner and are parsed before anything is written.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StudySessionPayload {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 100))]
    pub subject: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default = "default_color")]
    #[validate(custom(function = "rules::validate_color"))]
    pub color: String,
    #[serde(default = "default_priority")]
    #[validate(custom(function = "rules::validate_priority"))]
    pub priority: String,
    #[serde(default)]
    pub notes: String,
}

fn default_color() -> String {
    "blue".to_string()
}

fn default_priority() -> String {
    "medium".to_string()
}

/// Parsed time fields of a session payload.
pub struct SessionTimes {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl StudySessionPayload {
    /// Validates the payload and parses its date/clock strings.
    pub fn parse_times(&self) -> Result<SessionTimes, AppError> {
        self.validate()?;
        let date = time::parse_date(&self.date).map_err(AppError::BadRequest)?;
        let start_time = time::parse_clock(&self.start_time).map_err(AppError::BadRequest)?;
        let end_time = time::parse_clock(&self.end_time).map_err(AppError::BadRequest)?;
        if end_time <= start_time {
            return Err(AppError::BadRequest(
                "end time must be after start time".to_string(),
            ));
        }
        Ok(SessionTimes {
            date,
            start_time,
            end_time,
        })
    }
}

/// Wire format for the planner: camelCase keys, `HH:MM` clock strings.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySessionResponse {
    pub id: StudySessionId,
    pub title: String,
    pub subject: String,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub color: String,
    pub priority: String,
    pub notes: String,
}

impl From<StudySession> for StudySessionResponse {
    fn from(session: StudySession) -> Self {
        Self {
            id: session.id,
            title: session.title,
            subject: session.subject,
            date: session.date,
            start_time: time::format_clock(session.start_time),
            end_time: time::format_clock(session.end_time),
            color: session.color,
            priority: session.priority,
            notes: session.notes,
        }
    }
}
