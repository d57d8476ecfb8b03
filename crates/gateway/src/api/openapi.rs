//! `GET /v1/openapi.json` — machine-readable description of the HTTP
//! surface, generated with `utoipa` the way the pack's control-plane
//! services document theirs.

use axum::response::{IntoResponse, Response};
use axum::Json;
use utoipa::OpenApi;

use qo_domain::request::{ChatResponse, HealthReport, Request};

#[derive(OpenApi)]
#[openapi(
    paths(crate::api::chat::completions, crate::api::session::get, crate::api::sessions::list, crate::api::health::get),
    components(schemas(Request, ChatResponse, HealthReport)),
    tags((name = "chat", description = "Conversational completions")),
    info(title = "query-orchestrator", description = "Conversational backend that classifies, routes, retrieves, synthesizes, and validates answers.")
)]
pub struct ApiDoc;

pub async fn get() -> Response {
    Json(ApiDoc::openapi()).into_response()
}
