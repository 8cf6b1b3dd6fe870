use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use rendergate_core::store::StoreError;
use rendergate_core::CoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific
/// variants. Implements [`IntoResponse`] to produce consistent
/// `{ "error": ..., "code": ... }` JSON bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `rendergate-core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Download requested for a job with no artifact (matches the
    /// legacy 404 "Not ready" response).
    #[error("Not ready")]
    NotReady,

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => classify_core_error(core),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::NotReady => (
                StatusCode::NOT_FOUND,
                "NOT_READY",
                "Not ready".to_string(),
            ),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Map a [`CoreError`] to an HTTP status, error code, and message.
///
/// Provider errors only reach this path from the synchronous ingestion
/// flow (the progress endpoint converts them to wire percentages
/// upstream), so they surface as 502 with the provider's detail.
fn classify_core_error(err: &CoreError) -> (StatusCode, &'static str, String) {
    match err {
        CoreError::NotFound(job_id) => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("Job {job_id} not found"),
        ),
        CoreError::NotReady(_) => (
            StatusCode::NOT_FOUND,
            "NOT_READY",
            "Not ready".to_string(),
        ),
        CoreError::Provider(provider) => {
            (StatusCode::BAD_GATEWAY, "PROVIDER_ERROR", provider.to_string())
        }
        CoreError::MalformedOutput(msg) => {
            (StatusCode::BAD_GATEWAY, "PROVIDER_ERROR", msg.clone())
        }
        CoreError::Store(StoreError::NotFound(job_id)) => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("Job {job_id} not found"),
        ),
        CoreError::Store(store) => {
            tracing::error!(error = %store, "Store error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
        CoreError::Io(io) => {
            tracing::error!(error = %io, "I/O error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}
