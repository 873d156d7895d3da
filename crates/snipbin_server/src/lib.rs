//! HTTP server wiring for Snipbin (API routes, handlers, shared state).

/// Bearer-token session extractors.
pub mod auth;
/// HTTP error mapping for API handlers.
pub mod error;
/// HTTP handlers for the JSON API.
pub mod handlers;

pub use snipbin_core::{config, db, models, AppError, Config, Database, DEFAULT_PORT};

use axum::{
    extract::DefaultBodyLimit,
    http::header,
    routing::{get, post},
    Router,
};
use snipbin_core::assist::Assistant;
use snipbin_core::{LanguageRegistry, Renderer};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

/// Slack added on top of `max_paste_size` for the request body limit, leaving
/// room for the JSON envelope around the content field.
const BODY_LIMIT_SLACK: usize = 64 * 1024;

/// Shared state passed to HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub config: Arc<Config>,
    pub registry: Arc<LanguageRegistry>,
    pub renderer: Arc<Renderer>,
    pub assistant: Arc<dyn Assistant>,
}

impl AppState {
    /// Construct shared application state.
    pub fn new(
        config: Config,
        db: Database,
        registry: LanguageRegistry,
        assistant: Arc<dyn Assistant>,
    ) -> Self {
        Self {
            db: Arc::new(db),
            config: Arc::new(config),
            registry: Arc::new(registry),
            renderer: Arc::new(Renderer::new()),
            assistant,
        }
    }
}

/// Resolve the listener address from the `BIND` env var override.
///
/// # Returns
/// The parsed `BIND` address, or `0.0.0.0:<config.port>` when `BIND` is
/// unset or unparseable.
pub fn resolve_bind_address(config: &Config) -> SocketAddr {
    let default_bind = SocketAddr::from(([0, 0, 0, 0], config.port));
    match std::env::var("BIND") {
        Ok(value) => match value.trim().parse::<SocketAddr>() {
            Ok(addr) => addr,
            Err(err) => {
                tracing::warn!(
                    "Invalid BIND='{}': {}. Falling back to {}",
                    value,
                    err,
                    default_bind
                );
                default_bind
            }
        },
        Err(_) => default_bind,
    }
}

/// Create the application router with all routes and middleware.
///
/// # Panics
/// Panics if static header values fail to parse (should not happen).
pub fn create_app(state: AppState) -> Router {
    let body_limit = state.config.max_paste_size + BODY_LIMIT_SLACK;

    // Pastes are meant to be shared across origins; previews are additionally
    // designed to be iframe-embedded, so no X-Frame-Options header is set.
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
        ])
        .allow_headers(tower_http::cors::Any);

    Router::new()
        .route(
            "/api/v1/pastes",
            post(handlers::paste::create_paste).get(handlers::paste::list_pastes),
        )
        .route(
            "/api/v1/pastes/:id",
            get(handlers::paste::get_paste)
                .put(handlers::paste::update_paste)
                .delete(handlers::paste::delete_paste),
        )
        .route("/api/v1/pastes/:id/raw", get(handlers::paste::get_paste_raw))
        .route("/api/v1/pastes/:id/html", get(handlers::paste::get_paste_html))
        .route(
            "/api/v1/pastes/:id/preview",
            get(handlers::paste::get_paste_preview),
        )
        .route("/api/v1/me/pastes", get(handlers::paste::my_pastes))
        .route("/api/v1/stats", get(handlers::paste::get_stats))
        .route("/api/v1/languages", get(handlers::language::list_languages))
        .route("/api/v1/auth/register", post(handlers::auth::register))
        .route("/api/v1/auth/login", post(handlers::auth::login))
        .route("/api/v1/auth/logout", post(handlers::auth::logout))
        .route("/api/v1/assist/detect", post(handlers::assist::detect))
        .route("/api/v1/assist/explain", post(handlers::assist::explain))
        .route("/api/v1/assist/complete", post(handlers::assist::complete))
        .route("/api/v1/assist/status", get(handlers::assist::status))
        .with_state(state)
        .layer(
            tower::ServiceBuilder::new()
                .layer(DefaultBodyLimit::max(body_limit))
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors)
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_CONTENT_TYPE_OPTIONS,
                    header::HeaderValue::from_static("nosniff"),
                )),
        )
}

/// Run the Axum server with graceful shutdown support.
///
/// # Errors
/// Returns any I/O error produced by `axum::serve`.
pub async fn serve_router(
    listener: tokio::net::TcpListener,
    state: AppState,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    let app = create_app(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
}
