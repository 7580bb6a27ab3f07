//! Axum route handlers for the Extraction API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::extraction::requirement::JobRequirement;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub requirement: JobRequirement,
}

/// POST /api/v1/requirements/extract
///
/// Extracts a structured requirement from raw text without matching.
/// Useful for previewing extraction before starting a run.
pub async fn handle_extract(
    State(state): State<AppState>,
    Json(request): Json<ExtractRequest>,
) -> Result<Json<ExtractResponse>, AppError> {
    if request.text.trim().is_empty() {
        return Err(AppError::Validation("text cannot be empty".to_string()));
    }

    let requirement = state.extractor().extract(&request.text).await?;

    Ok(Json(ExtractResponse { requirement }))
}
