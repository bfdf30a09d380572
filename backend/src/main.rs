use axum::{http::Method, middleware as axum_middleware};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use studyflow_backend::{
    app,
    config::Config,
    db::connection::{create_pool, DbPool},
    middleware::logging,
    services::focus,
    utils::time,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "studyflow_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::load()?;
    tracing::info!(
        database_url = %config.database_url,
        bind_addr = %config.bind_addr,
        time_zone = %config.time_zone,
        focus_stale_hours = config.focus_stale_hours,
        ai_configured = config.ai_api_key.is_some(),
        "Loaded configuration from environment/.env"
    );

    // Initialize database
    let pool: DbPool = create_pool(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    // Reap focus sessions abandoned before the last shutdown. The same sweep
    // is available as the `focus_cleanup` binary for periodic scheduling.
    let now = time::now_local(&config.time_zone);
    focus::cleanup_stale(&pool, now, config.focus_stale_hours).await?;

    let bind_addr = config.bind_addr.clone();
    let router = app(pool, config).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(axum_middleware::from_fn(logging::log_error_responses))
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods([
                        Method::GET,
                        Method::POST,
                        Method::PUT,
                        Method::DELETE,
                        Method::OPTIONS,
                    ])
                    .allow_headers(Any)
                    .max_age(std::time::Duration::from_secs(24 * 60 * 60)),
            ),
    );

    // Start server
    tracing::info!("Server listening on {}", bind_addr);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
