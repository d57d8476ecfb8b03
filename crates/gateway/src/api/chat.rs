//! `POST /v1/chat/completions` — the single conversational entry point.
//!
//! The orchestrator never propagates an error out of `run()`; a failed
//! stage degrades the response instead. The wall-clock ceiling enforced
//! here (`server.request_timeout_ms`) is the one place a `504`-class
//! error can still legitimately escape to the caller.

use std::time::Duration;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;

use qo_domain::error::Error;
use qo_domain::request::Request;

use crate::api::error::ApiError;
use crate::AppState;

#[utoipa::path(
    post,
    path = "/v1/chat/completions",
    tag = "chat",
    request_body = Request,
    responses((status = 200, description = "A best-effort answer, possibly degraded", body = qo_domain::request::ChatResponse))
)]
pub async fn completions(State(state): State<AppState>, Json(request): Json<Request>) -> Response {
    if request.messages.is_empty() {
        return ApiError::bad_request("messages must contain at least one entry").into_response();
    }

    let timeout = Duration::from_millis(state.config.server.request_timeout_ms);
    match tokio::time::timeout(timeout, state.orchestrator.run(request)).await {
        Ok(response) => Json(response).into_response(),
        Err(_) => {
            let err = Error::BudgetExceeded {
                stage: "request".to_string(),
                elapsed_ms: timeout.as_millis() as u64,
                budget_ms: timeout.as_millis() as u64,
            };
            ApiError::from_domain(&err, None).into_response()
        }
    }
}
