//! `GET /metrics` — Prometheus text exposition of the recorder installed
//! in [`crate::bootstrap::build_state`].

use axum::extract::State;
use axum::response::{IntoResponse, Response};

use crate::AppState;

pub async fn get(State(state): State<AppState>) -> Response {
    state.metrics_handle.render().into_response()
}
