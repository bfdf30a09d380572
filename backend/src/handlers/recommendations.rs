use axum::{
    extract::{Query, State},
    Json,
};

use crate::config::Config;
use crate::db::connection::DbPool;
use crate::error::AppError;
use crate::services::recommend::{
    self, ChatCompletionsGenerator, RecommendationGenerator, RecommendationsResponse,
};
use crate::utils::time;

use super::UserScope;

/// Builds the study context and asks the configured generator for
/// recommendations. Generator failures degrade to the fixed default list;
/// only a failure to read the user's own data is an error.
pub async fn get_recommendations(
    State((pool, config)): State<(DbPool, Config)>,
    Query(scope): Query<UserScope>,
) -> Result<Json<RecommendationsResponse>, AppError> {
    let today = time::today_local(&config.time_zone);
    let context = recommend::build_context(&pool, scope.user_id(), today).await?;

    let result = match ChatCompletionsGenerator::from_config(&config) {
        Some(generator) => generator.generate(&context).await,
        None => Err(anyhow::anyhow!("recommendation generator not configured")),
    };

    Ok(Json(RecommendationsResponse::from_result(result)))
}
