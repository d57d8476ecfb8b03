pub mod chat;
pub mod error;
pub mod health;
pub mod metrics;
pub mod openapi;
pub mod session;
pub mod sessions;

use std::time::Duration;

use axum::error_handling::HandleErrorLayer;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use axum_prometheus::PrometheusMetricLayer;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Builds the full HTTP router. Inbound concurrency above
/// `server.max_concurrent_requests` is shed immediately with a `503`
/// rather than queued, per the backpressure requirement on
/// `POST /v1/chat/completions`.
pub fn router(state: AppState, metrics_layer: PrometheusMetricLayer) -> Router {
    let max_concurrent = state.config.server.max_concurrent_requests;

    Router::new()
        .route("/v1/chat/completions", post(chat::completions))
        .route("/session/:id", get(session::get))
        .route("/sessions", get(sessions::list))
        .route("/health", get(health::get))
        .route("/metrics", get(metrics::get))
        .route("/v1/openapi.json", get(openapi::get))
        .with_state(state)
        .layer(metrics_layer)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_overload))
                .load_shed()
                .concurrency_limit(max_concurrent),
        )
}

async fn handle_overload(_err: tower::BoxError) -> (StatusCode, axum::Json<serde_json::Value>) {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        axum::Json(serde_json::json!({
            "error": {
                "code": "overloaded",
                "message": "too many concurrent requests",
                "retryable": true
            }
        })),
    )
}
