use std::sync::Arc;

use crate::extraction::extractor::RequirementExtractor;
use crate::pipeline::session::{SessionDeps, SessionRegistry};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Collaborators handed to every new session.
    pub deps: SessionDeps,
    pub sessions: Arc<SessionRegistry>,
}

impl AppState {
    pub fn new(deps: SessionDeps, sessions: Arc<SessionRegistry>) -> Self {
        Self { deps, sessions }
    }

    pub fn extractor(&self) -> &dyn RequirementExtractor {
        self.deps.extractor.as_ref()
    }
}
