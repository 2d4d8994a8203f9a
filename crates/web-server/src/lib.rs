use anyhow::Context;
use axum::{
    extract::{DefaultBodyLimit, Request},
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::{get, post},
    Router,
};
use configuration::{Config, ServerSettings};
use core_types::RequestContext;
use database::{DbRepository, Storage};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
// Note: Tracing is initialized by the binary, not here.

pub mod error;
pub mod extract;
pub mod handlers;
pub mod lifecycle;

pub use lifecycle::{serve, shutdown_signal, Phase, ServeError};

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
    /// Budget for the storage work of a single request.
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(storage: Arc<dyn Storage>, request_timeout: Duration) -> Self {
        Self { storage, request_timeout }
    }
}

/// Builds the router with every route and middleware layer.
///
/// Fails only when a configured CORS origin is not a valid header value.
pub fn build_router(state: Arc<AppState>, settings: &ServerSettings) -> anyhow::Result<Router> {
    let cors = cors_layer(&settings.cors_origins)?;

    // --- DEFINE THE APPLICATION ROUTES ---
    let app = Router::new()
        .route(
            "/register/enterprise",
            post(handlers::register_enterprise).get(handlers::list_enterprises),
        )
        .route(
            "/register/event",
            post(handlers::register_event).get(handlers::list_events),
        )
        .route(
            "/register/user",
            post(handlers::register_participant).get(handlers::list_participants),
        )
        .route("/api/posts", post(handlers::create_post).get(handlers::list_posts))
        .route(
            "/api/comments",
            post(handlers::create_comment).get(handlers::list_comments),
        )
        .route("/health", get(handlers::health))
        .with_state(state)
        // Layers run outside-in from the bottom: the request id is assigned
        // first so the trace span and the handlers can see it.
        .layer(cors)
        .layer(CatchPanicLayer::new())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            let request_id = request
                .headers()
                .get(extract::REQUEST_ID_HEADER)
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default();
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id,
            )
        }))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(DefaultBodyLimit::max(settings.body_limit));

    Ok(app)
}

fn cors_layer(origins: &[String]) -> anyhow::Result<CorsLayer> {
    let mut allowed = Vec::with_capacity(origins.len());
    for origin in origins {
        // Credentialed CORS cannot use a wildcard origin.
        anyhow::ensure!(origin != "*", "CORS origin \"*\" cannot be combined with credentials");
        let value = HeaderValue::from_str(origin)
            .with_context(|| format!("invalid CORS origin {origin:?}"))?;
        allowed.push(value);
    }

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([ACCEPT, AUTHORIZATION, CONTENT_TYPE])
        .allow_credentials(true))
}

/// Runs the whole server lifecycle: connect, migrate, bind, serve, drain.
///
/// Storage and bind failures abort startup. A failed migration is logged and
/// the server keeps going with the schema it finds, unless
/// `database.require_migrations` is set. Shutdown problems are logged only.
pub async fn run_server(config: Config) -> anyhow::Result<()> {
    let pool = database::connect(&config.database)
        .await
        .context("failed to init storage")?;
    let repo = DbRepository::new(pool);
    let probe = RequestContext::new("startup", config.database.acquire_timeout());
    repo.ping(&probe).await.context("storage is not reachable")?;
    Phase::Connected.enter();

    if let Err(e) = database::run_migrations(repo.pool()).await {
        if config.database.require_migrations {
            return Err(e).context("failed to make migrations");
        }
        tracing::error!(
            error = %e,
            "Failed to make migrations; continuing with the current schema."
        );
    }
    Phase::MigrationApplied.enter();

    let app_state = Arc::new(AppState::new(Arc::new(repo), config.server.request_timeout()));
    let app = build_router(app_state, &config.server)?;

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(address = %addr, "Web server listening.");

    match serve(listener, app, shutdown_signal(), config.server.drain_timeout()).await {
        Ok(()) => tracing::info!("Gracefully stopped."),
        Err(e) => tracing::error!(error = %e, "Failed to stop server cleanly."),
    }
    Phase::Stopped.enter();

    Ok(())
}
