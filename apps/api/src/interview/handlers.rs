//! Axum route handlers for interview requests, form drafts and notifications.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::workflow::{InterviewForm, InterviewRequest};
use crate::notifications::Notification;
use crate::pipeline::handlers::find_session;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewFormResponse {
    pub candidate_id: String,
    pub form: InterviewForm,
    /// True while a request for this candidate is outstanding; the submit action is disabled.
    pub requesting: bool,
}

#[derive(Debug, Serialize)]
pub struct NotificationsResponse {
    pub notifications: Vec<Notification>,
}

/// POST /api/v1/sessions/:id/interviews
pub async fn handle_request_interview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<InterviewRequest>,
) -> Result<StatusCode, AppError> {
    let session = find_session(&state, id)?;
    session.request_interview(request).await?;
    Ok(StatusCode::ACCEPTED)
}

/// GET /api/v1/sessions/:id/interviews/:candidate_id/form
///
/// Opens the form, returning any draft retained from a failed submission.
pub async fn handle_open_form(
    State(state): State<AppState>,
    Path((id, candidate_id)): Path<(Uuid, String)>,
) -> Result<Json<InterviewFormResponse>, AppError> {
    let session = find_session(&state, id)?;
    let workflow = session.interviews();
    Ok(Json(InterviewFormResponse {
        form: workflow.open_form(&candidate_id),
        requesting: workflow.is_requesting(&candidate_id),
        candidate_id,
    }))
}

/// PUT /api/v1/sessions/:id/interviews/:candidate_id/form
pub async fn handle_update_form(
    State(state): State<AppState>,
    Path((id, candidate_id)): Path<(Uuid, String)>,
    Json(form): Json<InterviewForm>,
) -> Result<Json<InterviewFormResponse>, AppError> {
    let session = find_session(&state, id)?;
    let workflow = session.interviews();
    workflow.update_form(&candidate_id, form.clone());
    Ok(Json(InterviewFormResponse {
        form,
        requesting: workflow.is_requesting(&candidate_id),
        candidate_id,
    }))
}

/// DELETE /api/v1/sessions/:id/interviews/:candidate_id/form
pub async fn handle_close_form(
    State(state): State<AppState>,
    Path((id, candidate_id)): Path<(Uuid, String)>,
) -> Result<StatusCode, AppError> {
    let session = find_session(&state, id)?;
    session.interviews().close_form(&candidate_id);
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/sessions/:id/notifications
pub async fn handle_notifications(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<NotificationsResponse>, AppError> {
    let session = find_session(&state, id)?;
    Ok(Json(NotificationsResponse {
        notifications: session.notifications(),
    }))
}
