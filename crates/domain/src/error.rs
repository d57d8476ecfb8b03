//! Shared error type used across all query-orchestrator crates.
//!
//! The variants mirror the error taxonomy in the system design: every
//! failure that can occur in a stage maps to exactly one of these, which
//! lets the orchestrator convert errors into stage outcomes (and, for the
//! three that are allowed to escape, into HTTP error responses) without a
//! second classification step downstream.

use serde::Serialize;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP: {0}")]
    Http(String),

    /// A stage exceeded its configured budget.
    #[error("budget exceeded in stage '{stage}' after {elapsed_ms}ms (budget {budget_ms}ms)")]
    BudgetExceeded {
        stage: String,
        elapsed_ms: u64,
        budget_ms: u64,
    },

    /// An adapter or search provider could not be reached or returned a
    /// server error / circuit-open response.
    #[error("upstream '{upstream}' unavailable: {message}")]
    UpstreamUnavailable { upstream: String, message: String },

    /// The LLM produced a reply that could not be parsed into the expected
    /// structured shape (e.g. the classifier's `{category, confidence,
    /// entities}` JSON).
    #[error("failed to parse structured output from '{source}': {message}")]
    ParseError { source: String, message: String },

    /// The validator rejected a candidate answer.
    #[error("validation failed: {0}")]
    ValidationFailed(String),

    /// The client disconnected or cancelled the request before it finished.
    #[error("cancelled by client")]
    CancelledByClient,

    /// The inbound concurrency limiter rejected the request.
    #[error("overloaded: {0}")]
    Overloaded(String),

    /// The config client has no value — neither fresh nor last-known-good —
    /// for the requested key.
    #[error("config unavailable: {0}")]
    ConfigUnavailable(String),

    #[error("config: {0}")]
    Config(String),

    #[error("auth: {0}")]
    Auth(String),

    #[error("internal: {0}")]
    Internal(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// The closed error-code set carried in the HTTP error response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Timeout,
    UpstreamUnavailable,
    ValidationFailed,
    Overloaded,
    BadRequest,
    Internal,
}

impl Error {
    /// Map to the closed `{code, retryable}` pair used in `{error: {...}}`
    /// HTTP responses (spec §6 "Exit / error shape").
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::BudgetExceeded { .. } => ErrorCode::Timeout,
            Error::UpstreamUnavailable { .. } => ErrorCode::UpstreamUnavailable,
            Error::ValidationFailed(_) => ErrorCode::ValidationFailed,
            Error::Overloaded(_) => ErrorCode::Overloaded,
            Error::ParseError { .. } | Error::Config(_) | Error::ConfigUnavailable(_) => {
                ErrorCode::Internal
            }
            Error::CancelledByClient => ErrorCode::BadRequest,
            Error::Auth(_) => ErrorCode::BadRequest,
            Error::Io(_) | Error::Json(_) | Error::Http(_) | Error::Internal(_) | Error::Other(_) => {
                ErrorCode::Internal
            }
        }
    }

    pub fn retryable(&self) -> bool {
        matches!(
            self,
            Error::BudgetExceeded { .. } | Error::UpstreamUnavailable { .. } | Error::Overloaded(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_exceeded_maps_to_timeout_and_is_retryable() {
        let e = Error::BudgetExceeded {
            stage: "retrieve".into(),
            elapsed_ms: 12_000,
            budget_ms: 10_000,
        };
        assert_eq!(e.code(), ErrorCode::Timeout);
        assert!(e.retryable());
    }

    #[test]
    fn validation_failed_is_not_retryable() {
        let e = Error::ValidationFailed("unsupported claim".into());
        assert_eq!(e.code(), ErrorCode::ValidationFailed);
        assert!(!e.retryable());
    }
}
