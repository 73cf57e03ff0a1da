//! # Who Did The Chores API Server
//!
//! Loads configuration, connects to PostgreSQL, applies pending migrations and
//! serves until Ctrl-C.
//!
//! ## Usage
//!
//! ```bash
//! WDTC_DATABASE__USERNAME=chores WDTC_DATABASE__PASSWORD=chores \
//! WDTC_DATABASE__HOSTNAME=localhost cargo run -p whodidthechores-api
//! ```

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use whodidthechores_api::app::{build_router, AppState};
use whodidthechores_shared::{
    auth::SessionManager,
    config::AppConfig,
    db::{
        migrations::run_migrations,
        pool::{close_pool, create_pool},
    },
    Repository,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "whodidthechores_api=debug,whodidthechores_shared=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Who Did The Chores API v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = AppConfig::load().context("Failed to load configuration")?;
    tracing::debug!(?config, "Configuration loaded");

    let pool = create_pool(config.pool_config())
        .await
        .context("Failed to connect to database")?;
    run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;

    let repo = Repository::new(pool.clone()).with_statement_timeout(config.statement_timeout());
    let sessions = SessionManager::with_ttl(repo.clone(), config.session_ttl());
    let app = build_router(AppState::new(repo, sessions));

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    tracing::info!("Server listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown signal received");
    close_pool(pool).await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
