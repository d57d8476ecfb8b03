//! The `{error: {code, message, stage?, retryable}}` shape every non-200
//! response carries (spec "Exit / error shape"). Only `CancelledByClient`,
//! `Overloaded`, and `Internal` ever reach this — every other failure is
//! absorbed by the orchestrator into a degraded 200 response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use qo_domain::error::{Error, ErrorCode};

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    stage: Option<String>,
    retryable: bool,
}

pub struct ApiError {
    status: StatusCode,
    code: ErrorCode,
    message: String,
    stage: Option<String>,
    retryable: bool,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> ApiError {
        ApiError {
            status: StatusCode::BAD_REQUEST,
            code: ErrorCode::BadRequest,
            message: message.into(),
            stage: None,
            retryable: false,
        }
    }

    pub fn not_found(message: impl Into<String>) -> ApiError {
        ApiError {
            status: StatusCode::NOT_FOUND,
            code: ErrorCode::BadRequest,
            message: message.into(),
            stage: None,
            retryable: false,
        }
    }

    pub fn overloaded(message: impl Into<String>) -> ApiError {
        ApiError {
            status: StatusCode::SERVICE_UNAVAILABLE,
            code: ErrorCode::Overloaded,
            message: message.into(),
            stage: None,
            retryable: true,
        }
    }

    pub fn internal(message: impl Into<String>) -> ApiError {
        ApiError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: ErrorCode::Internal,
            message: message.into(),
            stage: None,
            retryable: false,
        }
    }

    /// Converts a domain error that escaped the orchestrator (cancellation,
    /// overload, or an internal fault) into its HTTP shape.
    pub fn from_domain(err: &Error, stage: Option<&str>) -> ApiError {
        let status = match err.code() {
            ErrorCode::Timeout => StatusCode::GATEWAY_TIMEOUT,
            ErrorCode::UpstreamUnavailable => StatusCode::BAD_GATEWAY,
            ErrorCode::ValidationFailed => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::Overloaded => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError {
            status,
            code: err.code(),
            message: err.to_string(),
            stage: stage.map(str::to_owned),
            retryable: err.retryable(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
                stage: self.stage,
                retryable: self.retryable,
            },
        };
        (self.status, Json(body)).into_response()
    }
}
