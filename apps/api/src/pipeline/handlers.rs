//! Axum route handlers for sessions and pipeline runs.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::sorter::{ResultSorter, SortKey};
use crate::pipeline::orchestrator::{RunInput, RunOutcome};
use crate::pipeline::session::{MatchingSession, SessionView};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
}

/// Exactly one of `text` or `jobId` must be set.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRequest {
    pub text: Option<String>,
    pub job_id: Option<String>,
}

impl RunRequest {
    fn into_input(self) -> Result<RunInput, AppError> {
        match (self.text, self.job_id) {
            (Some(text), None) if !text.trim().is_empty() => Ok(RunInput::Text(text)),
            (Some(_), None) => Err(AppError::Validation("text cannot be empty".to_string())),
            (None, Some(job_id)) if !job_id.trim().is_empty() => {
                Ok(RunInput::JobId(job_id.trim().to_string()))
            }
            (None, Some(_)) => Err(AppError::Validation("jobId cannot be empty".to_string())),
            _ => Err(AppError::Validation(
                "provide exactly one of text or jobId".to_string(),
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SortRequest {
    pub key: SortKey,
}

#[derive(Debug, Serialize)]
pub struct SortResponse {
    pub sort: ResultSorter,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

pub(crate) fn find_session(state: &AppState, id: Uuid) -> Result<Arc<MatchingSession>, AppError> {
    state
        .sessions
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
}

/// POST /api/v1/sessions
///
/// Refused with 503 while the live-session limit is reached.
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<CreateSessionResponse>), AppError> {
    let session = state.sessions.create(&state.deps)?;
    Ok((
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            session_id: session.id(),
        }),
    ))
}

/// DELETE /api/v1/sessions/:id
///
/// Discards the session and all of its results.
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Session {id} not found")))
    }
}

/// POST /api/v1/sessions/:id/run
///
/// Runs extraction → matching. Responds when this run finishes; `applied: false`
/// means a newer run superseded it and `state` shows the newer run's view.
pub async fn handle_run(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<RunRequest>,
) -> Result<Json<RunOutcome>, AppError> {
    let session = find_session(&state, id)?;
    let input = request.into_input()?;
    Ok(Json(session.run(input).await))
}

/// GET /api/v1/sessions/:id/state
pub async fn handle_get_state(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = find_session(&state, id)?;
    Ok(Json(session.view()))
}

/// POST /api/v1/sessions/:id/sort
pub async fn handle_sort(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SortRequest>,
) -> Result<Json<SortResponse>, AppError> {
    let session = find_session(&state, id)?;
    Ok(Json(SortResponse {
        sort: session.sort_by(request.key),
    }))
}
