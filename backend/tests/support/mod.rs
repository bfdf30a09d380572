#![allow(dead_code)]

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::OnceLock;
use tokio::sync::Mutex;

use studyflow_backend::types::UserId;

/// Serializes tests within one binary; they share the database.
pub async fn integration_guard() -> tokio::sync::MutexGuard<'static, ()> {
    static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
    GUARD.get_or_init(|| Mutex::new(())).lock().await
}

/// Connects to `TEST_DATABASE_URL` and applies migrations. Returns `None`
/// when the variable is unset so the suite skips instead of failing on
/// machines without a database.
pub async fn test_pool() -> Option<PgPool> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("connect test database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("run migrations");
    Some(pool)
}

/// Clears every table except `users`; the seeded default user stays.
pub async fn reset(pool: &PgPool) {
    sqlx::query(
        "TRUNCATE current_focus_session, focus_sessions, study_sessions, tasks RESTART IDENTITY",
    )
    .execute(pool)
    .await
    .expect("truncate tables");
}

pub async fn seed_user(pool: &PgPool, username: &str) -> UserId {
    sqlx::query_scalar::<_, UserId>(
        "INSERT INTO users (username, email, full_name) VALUES ($1, $2, $3) \
         ON CONFLICT (username) DO UPDATE SET email = EXCLUDED.email \
         RETURNING id",
    )
    .bind(username)
    .bind(format!("{username}@example.com"))
    .bind(username)
    .fetch_one(pool)
    .await
    .expect("seed user")
}
