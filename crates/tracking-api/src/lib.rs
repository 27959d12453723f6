//! # tracking-api: Axum API Service for Tracking Number Issuance
//!
//! Wraps the `tracking-core` validator and generator in an HTTP surface
//! and persists every issued number through a store that owns uniqueness.
//!
//! ## API Surface
//!
//! | Route                                   | Module                 | Purpose            |
//! |-----------------------------------------|------------------------|--------------------|
//! | `/v1/tracking-numbers/next`             | [`routes::tracking`]   | Issue              |
//! | `/v1/tracking-numbers/{tracking_number}`| [`routes::tracking`]   | Lookup             |
//! | `/v1/metrics`                           | [`routes::tracking`]   | Counter snapshot   |
//! | `/openapi.json`                         | [`openapi`]            | OpenAPI document   |
//! | `/health/*`                             | this module            | Probes             |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → Handler
//! ```

pub mod db;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod orchestration;
pub mod routes;
pub mod state;
pub mod store;

use axum::middleware::from_fn;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
///
/// Health probes (`/health/*`) sit outside the metrics middleware so
/// orchestrator polling does not inflate request counts.
pub fn app(state: AppState) -> Router {
    let metrics = state.metrics.clone();

    let api = Router::new()
        .merge(routes::tracking::router())
        .merge(openapi::router())
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(axum::Extension(metrics))
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    Router::new().merge(health).merge(api)
}

/// Liveness probe: always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: returns 200 when the application is ready to serve.
async fn readiness() -> &'static str {
    "ready"
}
