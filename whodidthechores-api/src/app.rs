/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use whodidthechores_api::app::{build_router, AppState};
/// use whodidthechores_shared::auth::SessionManager;
/// use whodidthechores_shared::db::pool::{create_pool, DatabaseConfig};
/// use whodidthechores_shared::Repository;
///
/// # async fn example() -> anyhow::Result<()> {
/// let pool = create_pool(DatabaseConfig::from_url("postgresql://localhost/whodidthechores")?).await?;
/// let repo = Repository::new(pool);
/// let state = AppState::new(repo.clone(), SessionManager::new(repo));
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
/// axum::serve(listener, build_router(state)).await?;
/// # Ok(())
/// # }
/// ```

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use whodidthechores_shared::{auth::SessionManager, Repository};

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor. Both
/// members wrap the same connection pool.
#[derive(Clone)]
pub struct AppState {
    pub repo: Repository,
    pub sessions: SessionManager,
}

impl AppState {
    pub fn new(repo: Repository, sessions: SessionManager) -> Self {
        Self { repo, sessions }
    }
}

/// Builds the Axum router
///
/// ```text
/// /
/// ├── GET  /health
/// └── /auth/
///     ├── POST /signup
///     ├── POST /login
///     ├── POST /logout
///     └── GET  /session
/// ```
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let auth_routes = Router::new()
        .route("/signup", post(routes::auth::sign_up))
        .route("/login", post(routes::auth::login))
        .route("/logout", post(routes::auth::logout))
        .route("/session", get(routes::auth::current_session));

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/auth", auth_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
