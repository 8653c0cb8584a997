//! # dpdp-api — Axum API for the DPDP Audit Checklist
//!
//! Serves one immutable catalog and any number of in-memory audit sessions.
//!
//! ## API Surface
//!
//! | Prefix              | Module                 | Domain                     |
//! |---------------------|------------------------|----------------------------|
//! | `/v1/catalog*`      | [`routes::catalog`]    | Catalog and guidance       |
//! | `/v1/sessions*`     | [`routes::sessions`]   | Sessions, stats, reports   |
//! | `/health/*`         | this module            | Liveness and readiness     |
//! | `/openapi.json`     | [`openapi`]            | Generated OpenAPI document |

pub mod error;
pub mod extractors;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::catalog::router())
        .merge(routes::sessions::router())
        .merge(openapi::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    Router::new().merge(health).merge(api)
}

/// Liveness check: 200 while the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness check: 200 once the catalog is loaded, which precedes serving.
async fn readiness() -> &'static str {
    "ready"
}
