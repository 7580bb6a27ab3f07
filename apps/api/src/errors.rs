use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::extraction::extractor::ExtractionError;
use crate::interview::workflow::RequestError;
use crate::pipeline::session::SessionLimitReached;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Interview request error: {0}")]
    InterviewRequest(#[from] RequestError),

    #[error("Session limit: {0}")]
    SessionLimit(#[from] SessionLimitReached),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            // Transport and schema failures read the same to the user; the kind is logged.
            AppError::Extraction(e) => {
                tracing::error!("Extraction error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "EXTRACTION_ERROR",
                    "Could not extract requirements from the job description".to_string(),
                )
            }
            AppError::InterviewRequest(RequestError::ValidationFailure(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::InterviewRequest(e @ RequestError::AlreadyInFlight(_)) => {
                (StatusCode::CONFLICT, "REQUEST_IN_FLIGHT", e.to_string())
            }
            AppError::InterviewRequest(RequestError::NetworkFailure(msg)) => {
                tracing::error!("Scheduling error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "SCHEDULING_ERROR",
                    "The interview request could not be sent".to_string(),
                )
            }
            AppError::SessionLimit(e) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "SESSION_LIMIT",
                format!("{e}; try again later"),
            ),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
