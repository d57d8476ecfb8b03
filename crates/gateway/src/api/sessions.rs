//! `GET /sessions?limit=N` — recent session summaries, most-recently-active
//! first.

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::AppState;

#[derive(Deserialize)]
pub struct ListParams {
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    20
}

#[derive(Serialize)]
struct SessionSummary {
    session_id: String,
    message_count: usize,
    last_activity: chrono::DateTime<chrono::Utc>,
}

#[utoipa::path(
    get,
    path = "/sessions",
    tag = "sessions",
    params(("limit" = Option<usize>, Query, description = "Max sessions to return, default 20")),
    responses((status = 200, description = "Recent session summaries, most-recently-active first"))
)]
pub async fn list(State(state): State<AppState>, Query(params): Query<ListParams>) -> Response {
    let sessions = state
        .orchestrator
        .sessions()
        .list(params.limit)
        .into_iter()
        .map(|s| SessionSummary {
            session_id: s.id,
            message_count: s.turns.len(),
            last_activity: s.last_activity,
        })
        .collect::<Vec<_>>();
    Json(sessions).into_response()
}
