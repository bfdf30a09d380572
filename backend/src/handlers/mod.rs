pub mod focus;
pub mod recommendations;
pub mod sessions;
pub mod stats;
pub mod tasks;

use serde::Deserialize;
use sqlx::PgPool;

use crate::error::AppError;
use crate::repositories::user as user_repo;
use crate::types::{UserId, DEFAULT_USER_ID};

/// Query fragment selecting the acting user. Single-user deployments omit it
/// and operate as user 1.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct UserScope {
    pub user_id: Option<i64>,
}

impl UserScope {
    pub fn user_id(&self) -> UserId {
        self.user_id.map(UserId).unwrap_or(DEFAULT_USER_ID)
    }
}

/// Rejects writes for user ids that have no user row, instead of letting the
/// foreign key surface as a 500.
pub(crate) async fn ensure_user(pool: &PgPool, user_id: UserId) -> Result<(), AppError> {
    user_repo::find_user(pool, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;
    Ok(())
}
