//! Warden Auth API
//!
//! Identity and credential service over HTTP.
//!
//! ## REST Endpoints
//!
//! - `POST /api/v1/auth/register` - Create an account and open a session
//! - `POST /api/v1/auth/login` - Open a session (replaces any previous one)
//! - `POST /api/v1/auth/refresh` - Exchange a refresh token for an access token
//! - `POST /api/v1/auth/logout` - Close the caller's session
//! - `GET /api/v1/profile/{user_id}` - Read a profile
//! - `PATCH /api/v1/profile/{user_id}` - Update a profile
//! - `DELETE /api/v1/profile/{user_id}` - Delete an account
//!
//! ## Health Endpoints
//!
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe
//! - `GET /metrics` - Prometheus metrics

mod config;
mod error;
mod extractors;
mod handlers;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use warden_auth_core::{AuthService, ProfileService, SessionManager};
use warden_db::{PgUserRepository, RedisSessionStore};

use crate::config::Config;
use crate::handlers::{health, ready};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("auth_api=debug".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Warden Auth API");

    let config = Config::from_env().context("loading configuration")?;
    tracing::info!(
        http_port = config.http_port,
        access_ttl_secs = config.auth.access_ttl.as_secs(),
        refresh_ttl_secs = config.auth.refresh_ttl.as_secs(),
        "Configuration loaded"
    );

    let metrics_handle = if config.metrics_enabled {
        Some(setup_metrics()?)
    } else {
        None
    };

    // Identity store
    let pool = warden_db::create_pool(&config.database_url)
        .await
        .context("connecting to PostgreSQL")?;
    tracing::info!("Database pool created");

    if config.run_migrations {
        warden_db::run_migrations(&pool)
            .await
            .context("applying migrations")?;
        tracing::info!("Migrations applied");
    }

    // Session store
    let store = RedisSessionStore::connect(&config.redis_uri, config.redis_password.as_deref())
        .await
        .context("connecting to Redis")?;
    tracing::info!("Session store connected");

    let sessions = SessionManager::from_config(Arc::new(store.clone()), &config.auth)
        .context("building session manager")?;
    let users = Arc::new(PgUserRepository::new(pool.clone()));

    let auth = AuthService::new(users.clone(), sessions.clone());
    let profile = ProfileService::new(users, sessions);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let state = AppState::new(auth, profile, pool, store, config);
    let app = build_router(state, metrics_handle);

    tracing::info!("HTTP server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn build_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let request_timeout = state.request_timeout();

    let api_v1 = Router::new()
        // Session routes
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login))
        .route("/auth/refresh", post(handlers::refresh))
        .route("/auth/logout", post(handlers::logout))
        // Profile routes
        .route(
            "/profile/{user_id}",
            get(handlers::get_profile)
                .patch(handlers::update_profile)
                .delete(handlers::delete_profile),
        );

    // Health routes (no timeout - must always respond quickly)
    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready));

    let metrics_route = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    // Outermost first
    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TimeoutLayer::new(request_timeout));

    Router::new()
        .nest("/api/v1", api_v1)
        .layer(middleware)
        .merge(health_routes)
        .merge(metrics_route)
        .with_state(state)
}

fn setup_metrics() -> anyhow::Result<PrometheusHandle> {
    // Argon2 dominates login/register latency, so the upper buckets matter
    let auth_latency_buckets = &[0.005, 0.01, 0.025, 0.05, 0.1, 0.2, 0.5, 1.0, 2.5, 5.0];

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("auth_operation_duration_seconds".to_string()),
            auth_latency_buckets,
        )?
        .install_recorder()?;

    metrics::describe_counter!("auth_registrations_total", "Registrations by result");
    metrics::describe_counter!("auth_logins_total", "Login attempts by result");
    metrics::describe_counter!("auth_refreshes_total", "Access token refreshes by result");
    metrics::describe_counter!("auth_logouts_total", "Logouts by result");
    metrics::describe_histogram!(
        "auth_operation_duration_seconds",
        "Auth and profile operation latency in seconds by operation"
    );

    Ok(handle)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
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

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
