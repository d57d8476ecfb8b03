//! `GET /health` — a best-effort liveness snapshot. Never makes a live
//! upstream call: reachability is inferred from each collaborator's own
//! cached state (adapter registration, config-client snapshot presence)
//! so this endpoint stays cheap enough to poll aggressively.

use std::collections::HashMap;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;

use qo_domain::request::{HealthComponents, HealthReport, HealthStatus};

use crate::AppState;

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Liveness snapshot", body = HealthReport))
)]
pub async fn get(State(state): State<AppState>) -> Response {
    let llm = !state.config.llm.tier_models.is_empty();
    let config = true;
    let cache = true;

    let adapters: HashMap<String, bool> = state.adapters.names().into_iter().map(|name| (name, true)).collect();

    let all_ok = llm && config && cache && adapters.values().all(|ok| *ok);
    let any_ok = llm || config || cache || adapters.values().any(|ok| *ok);
    let status = if all_ok {
        HealthStatus::Healthy
    } else if any_ok {
        HealthStatus::Degraded
    } else {
        HealthStatus::Unhealthy
    };

    Json(HealthReport {
        status,
        components: HealthComponents { llm, config, cache, adapters },
    })
    .into_response()
}
