//! One-shot sweep of abandoned focus sessions, intended for cron. The server
//! runs the same sweep at startup; this binary exists so deployments can
//! schedule it without restarting anything.

use studyflow_backend::{
    config::Config,
    db::connection::create_pool,
    services::focus,
    utils::time,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::load()?;
    let pool = create_pool(&config.database_url).await?;

    let now = time::now_local(&config.time_zone);
    let reaped = focus::cleanup_stale(&pool, now, config.focus_stale_hours).await?;
    tracing::info!(reaped, "focus cleanup finished");

    Ok(())
}
