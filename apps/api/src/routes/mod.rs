pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::extraction::handlers as extraction;
use crate::interview::handlers as interview;
use crate::pipeline::handlers as pipeline;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Extraction preview
        .route("/api/v1/requirements/extract", post(extraction::handle_extract))
        // Sessions + pipeline
        .route("/api/v1/sessions", post(pipeline::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            axum::routing::delete(pipeline::handle_delete_session),
        )
        .route("/api/v1/sessions/:id/run", post(pipeline::handle_run))
        .route("/api/v1/sessions/:id/state", get(pipeline::handle_get_state))
        .route("/api/v1/sessions/:id/sort", post(pipeline::handle_sort))
        // Interview workflow
        .route(
            "/api/v1/sessions/:id/interviews",
            post(interview::handle_request_interview),
        )
        .route(
            "/api/v1/sessions/:id/interviews/:candidate_id/form",
            get(interview::handle_open_form)
                .put(interview::handle_update_form)
                .delete(interview::handle_close_form),
        )
        .route(
            "/api/v1/sessions/:id/notifications",
            get(interview::handle_notifications),
        )
        .with_state(state)
}
