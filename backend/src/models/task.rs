use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::error::AppError;
use crate::types::{TaskId, UserId};
use crate::utils::time;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: TaskId,
    pub user_id: UserId,
    pub title: String,
    pub due_date: NaiveDate,
    pub completed: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskPayload {
    #[validate(length(min = 1, max = 300))]
    pub title: String,
    pub due_date: String,
}

impl TaskPayload {
    pub fn parse_due_date(&self) -> Result<NaiveDate, AppError> {
        self.validate()?;
        time::parse_date(&self.due_date).map_err(AppError::BadRequest)
    }
}

/// Wire format for the planner; `due` is the relative display label.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: TaskId,
    pub title: String,
    pub due_date: NaiveDate,
    pub completed: bool,
    pub due: String,
}

impl TaskResponse {
    pub fn from_task(task: Task, today: NaiveDate) -> Self {
        let due = time::due_label(task.due_date, today);
        Self {
            id: task.id,
            title: task.title,
            due_date: task.due_date,
            completed: task.completed,
            due,
        }
    }
}
