//! `GET /session/{id}` — a single session's transcript.

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use qo_domain::session::Turn;

use crate::api::error::ApiError;
use crate::AppState;

#[derive(Serialize)]
struct SessionView {
    session_id: String,
    message_count: usize,
    last_activity: chrono::DateTime<chrono::Utc>,
    turns: Vec<Turn>,
}

#[utoipa::path(
    get,
    path = "/session/{id}",
    tag = "sessions",
    params(("id" = String, Path, description = "Session id")),
    responses(
        (status = 200, description = "Session transcript"),
        (status = 404, description = "No session with that id")
    )
)]
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.orchestrator.sessions().get(&id) {
        Some(session) => Json(SessionView {
            session_id: session.id.clone(),
            message_count: session.turns.len(),
            last_activity: session.last_activity,
            turns: session.turns.into_iter().collect(),
        })
        .into_response(),
        None => ApiError::not_found(format!("no session '{id}'")).into_response(),
    }
}
