use crate::{
    auth::{self, PasswordHasher},
    store::UserStore,
    views::Views,
};
use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{HeaderName, HeaderValue, Request},
    middleware,
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;
use tokio::{net::TcpListener, signal};
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer,
    services::ServeDir,
    set_header::SetRequestHeaderLayer,
    trace::{DefaultOnResponse, TraceLayer},
};
use tower_sessions::MemoryStore;
use tracing::{info, info_span, Level, Span};
use ulid::Ulid;

pub mod config;
pub(crate) mod handlers;

pub use self::config::{AppConfig, Environment};

/// Everything a handler needs besides the request.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub hasher: PasswordHasher,
    pub views: Arc<Views>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn UserStore>, hasher: PasswordHasher, views: Arc<Views>) -> Self {
        Self {
            store,
            hasher,
            views,
        }
    }
}

/// Build the application router. `sessions` backs the session layer so
/// callers decide its lifetime.
#[must_use]
pub fn router(state: AppState, config: &AppConfig, sessions: MemoryStore) -> Router {
    let guest = Router::new()
        .route(
            "/login",
            get(handlers::user_login::login_page).post(handlers::user_login::login),
        )
        .route(
            "/register",
            get(handlers::user_register::register_page).post(handlers::user_register::register),
        )
        .route_layer(middleware::from_fn(auth::require_not_authenticated));

    let members = Router::new()
        .route("/user", get(handlers::user::user))
        .route("/logout", post(handlers::user::logout))
        .route_layer(middleware::from_fn(auth::require_authenticated));

    let mut app = Router::new()
        .route("/", get(handlers::root::index))
        .route("/sample", get(handlers::root::sample))
        .route(
            "/health",
            get(handlers::health::health).options(handlers::health::health),
        )
        .merge(guest)
        .merge(members);

    if config.serve_static() {
        app = app.nest_service("/static", ServeDir::new(config.static_dir()));
    }

    let app = config.session().apply(app, sessions);

    let response_level = if config.log_requests() {
        Level::INFO
    } else {
        Level::DEBUG
    };

    app.layer(
        ServiceBuilder::new()
            .layer(SetRequestHeaderLayer::if_not_present(
                HeaderName::from_static("x-request-id"),
                |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
            ))
            .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                "x-request-id",
            )))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(make_span)
                    .on_response(DefaultOnResponse::new().level(response_level)),
            )
            .layer(Extension(state.store))
            .layer(Extension(state.hasher))
            .layer(Extension(state.views)),
    )
}

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(port: u16, config: AppConfig, state: AppState) -> Result<()> {
    let app = router(state, &config, MemoryStore::default());

    let listener = TcpListener::bind(format!("::0:{port}"))
        .await
        .with_context(|| format!("Failed to bind port {port}"))?;

    info!(
        "Listening on [::]:{} ({})",
        port,
        config.environment().as_str()
    );

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {err}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Gracefully shutdown");
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}
