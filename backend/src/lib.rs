pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod services;
pub mod types;
pub mod utils;
pub mod validation;

use axum::{
    routing::{get, post, put},
    Router,
};

use config::Config;
use db::connection::DbPool;

/// Builds the API router. Kept out of `main` so the binary and tests share
/// one route table.
pub fn app(pool: DbPool, config: Config) -> Router {
    Router::new()
        .route(
            "/api/sessions",
            get(handlers::sessions::list_sessions).post(handlers::sessions::create_session),
        )
        .route(
            "/api/sessions/{id}",
            put(handlers::sessions::update_session).delete(handlers::sessions::delete_session),
        )
        .route(
            "/api/tasks",
            get(handlers::tasks::list_tasks).post(handlers::tasks::create_task),
        )
        .route("/api/tasks/{id}/toggle", post(handlers::tasks::toggle_task))
        .route(
            "/api/tasks/{id}",
            axum::routing::delete(handlers::tasks::delete_task),
        )
        .route("/api/focus/start", post(handlers::focus::start_focus))
        .route("/api/focus/end", post(handlers::focus::end_focus))
        .route("/api/focus/current", get(handlers::focus::get_current_focus))
        .route("/api/focus/history", get(handlers::focus::get_focus_history))
        .route(
            "/api/stats/dashboard",
            get(handlers::stats::get_dashboard_stats),
        )
        .route(
            "/api/stats/progress",
            get(handlers::stats::get_progress_stats),
        )
        .route(
            "/api/recommendations",
            get(handlers::recommendations::get_recommendations),
        )
        .with_state((pool, config))
}
