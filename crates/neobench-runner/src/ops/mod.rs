//! Operational HTTP endpoints.
//!
//! - `/healthz` : liveness
//! - `/readyz`  : 200 once the benchmark run has completed, 503 while running
//! - `/metrics` : Prometheus text format (path configurable)

use axum::{extract::State, http::StatusCode, response::{IntoResponse, Response}};

use crate::app_state::AppState;

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    if state.is_run_complete() {
        (StatusCode::OK, "done")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "running")
    }
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    let body = state.metrics().render();

    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
        .into_response()
}
