//! # oasf-api: HTTP Service for OASF Records
//!
//! Exposes record validation and record translation over JSON/HTTP.
//!
//! ## API Surface
//!
//! | Route                                | Module                    |
//! |--------------------------------------|---------------------------|
//! | `POST /v1/validation/record`         | [`routes::validation`]    |
//! | `POST /v1/validation/record/stream`  | [`routes::validation`]    |
//! | `POST /v1/translation/vscode-copilot`| [`routes::translation`]   |
//! | `POST /v1/translation/a2a`           | [`routes::translation`]   |
//! | `GET /openapi.json`                  | [`openapi`]               |
//! | `GET /metrics`                       | Prometheus text format    |
//! | `GET /health/liveness`, `/readiness` | probes                    |
//!
//! Handlers share one [`state::AppState`]; the schema registry inside it is
//! built once at startup and only read afterwards.

pub mod error;
pub mod extractors;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the full application router.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::validation::router())
        .merge(routes::translation::router())
        .merge(openapi::router())
        .route("/metrics", get(render_metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness));

    Router::new().merge(health).merge(api)
}

/// Liveness probe. Always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe. The registry is loaded before the listener binds, so a
/// serving process is ready.
async fn readiness() -> &'static str {
    "ready"
}

async fn render_metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed").into_response(),
    }
}
