//! # tidas-proxy — HTTP Proxy for the Tidas Identity Service
//!
//! A small Axum service that sits between application backends and the
//! hosted Tidas passwordless-identity provider. It owns request parsing,
//! validation, authentication, and a uniform error contract; identity
//! payloads pass through to the provider untouched via `tidas-client`.
//!
//! ## API Surface
//!
//! | Method | Path                  | Module               | Purpose              |
//! |--------|-----------------------|----------------------|----------------------|
//! | GET    | `/tidas_ping`         | [`routes::identity`] | Upstream health      |
//! | POST   | `/process_enrollment` | [`routes::identity`] | Enroll an identity   |
//! | POST   | `/process_validation` | [`routes::identity`] | Validate an identity |
//! | GET    | `/openapi.json`       | [`openapi`]          | OpenAPI spec         |
//! | GET    | `/health/liveness`    | (unauthenticated)    | Process liveness     |
//! | GET    | `/health/readiness`   | (unauthenticated)    | Readiness probe      |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → AuthMiddleware → Handler
//! ```
//!
//! ## OpenAPI
//!
//! Auto-generated spec via utoipa derive macros at `/openapi.json`.

pub mod auth;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::middleware::from_fn;
use axum::Router;

use crate::auth::AuthConfig;
use crate::middleware::metrics::ProxyMetrics;
use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
///
/// Health probes (`/health/*`) are mounted outside the auth middleware
/// so they remain accessible without credentials.
pub fn app(state: AppState) -> Router {
    let auth_config = AuthConfig {
        token: state.config.auth_token.clone(),
    };
    let metrics = ProxyMetrics::new();

    // Authenticated API routes.
    let api = Router::new()
        .merge(routes::identity::router())
        .merge(openapi::router())
        .layer(from_fn(auth::auth_middleware))
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(middleware::tracing_layer::layer())
        .layer(axum::Extension(auth_config))
        .layer(axum::Extension(metrics))
        .with_state(state);

    // Unauthenticated health probes.
    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    Router::new().merge(health).merge(api)
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — returns 200 when the application is ready to serve.
async fn readiness() -> &'static str {
    "ready"
}
