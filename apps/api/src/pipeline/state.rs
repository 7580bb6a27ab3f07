//! Pipeline state machine.
//!
//! ```text
//! Idle ──Started──▶ Extracting ──Extracted──▶ Matching ──Matched──▶ Ready
//!                       │                        │
//!                       └────────Failed──────────┴──▶ Failed
//! ```
//! `Started` is accepted from every state and clears any previous `Ready`/`Failed`.

use serde::Serialize;
use thiserror::Error;

use crate::extraction::requirement::JobRequirement;
use crate::matching::scoring::MatchResult;
use crate::models::job::JobPosting;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FailureKind {
    ExtractionFailed,
    MatchingFailed,
}

/// Single source of truth for what the presentation layer may render.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum PipelineState {
    Idle,
    Extracting,
    Matching,
    Ready {
        requirement: JobRequirement,
        results: Vec<MatchResult>,
        /// The posting the run was triggered from; absent for raw-text runs.
        job: Option<JobPosting>,
    },
    Failed {
        kind: FailureKind,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    Started,
    Extracted,
    Matched {
        requirement: JobRequirement,
        results: Vec<MatchResult>,
        job: Option<JobPosting>,
    },
    Failed {
        kind: FailureKind,
        message: String,
    },
}

impl PipelineEvent {
    pub fn name(&self) -> &'static str {
        match self {
            PipelineEvent::Started => "started",
            PipelineEvent::Extracted => "extracted",
            PipelineEvent::Matched { .. } => "matched",
            PipelineEvent::Failed { .. } => "failed",
        }
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("event '{event}' is not valid in state '{from}'")]
pub struct InvalidTransition {
    pub from: &'static str,
    pub event: &'static str,
}

impl PipelineState {
    pub fn name(&self) -> &'static str {
        match self {
            PipelineState::Idle => "idle",
            PipelineState::Extracting => "extracting",
            PipelineState::Matching => "matching",
            PipelineState::Ready { .. } => "ready",
            PipelineState::Failed { .. } => "failed",
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, PipelineState::Extracting | PipelineState::Matching)
    }

    /// The transition function. Returns the next state, or an error for an event the
    /// current state does not accept.
    pub fn apply(&self, event: PipelineEvent) -> Result<PipelineState, InvalidTransition> {
        match (self, event) {
            (_, PipelineEvent::Started) => Ok(PipelineState::Extracting),
            (PipelineState::Extracting, PipelineEvent::Extracted) => Ok(PipelineState::Matching),
            (
                PipelineState::Matching,
                PipelineEvent::Matched {
                    requirement,
                    results,
                    job,
                },
            ) => Ok(PipelineState::Ready {
                requirement,
                results,
                job,
            }),
            (
                PipelineState::Extracting | PipelineState::Matching,
                PipelineEvent::Failed { kind, message },
            ) => Ok(PipelineState::Failed { kind, message }),
            (state, event) => Err(InvalidTransition {
                from: state.name(),
                event: event.name(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready() -> PipelineState {
        PipelineState::Ready {
            requirement: JobRequirement::default(),
            results: vec![],
            job: None,
        }
    }

    fn failed(kind: FailureKind) -> PipelineEvent {
        PipelineEvent::Failed {
            kind,
            message: "boom".to_string(),
        }
    }

    #[test]
    fn test_happy_path() {
        let state = PipelineState::Idle
            .apply(PipelineEvent::Started)
            .and_then(|s| s.apply(PipelineEvent::Extracted))
            .and_then(|s| {
                s.apply(PipelineEvent::Matched {
                    requirement: JobRequirement::default(),
                    results: vec![],
                    job: None,
                })
            })
            .unwrap();
        assert_eq!(state, ready());
    }

    #[test]
    fn test_started_clears_ready_and_failed() {
        assert_eq!(ready().apply(PipelineEvent::Started), Ok(PipelineState::Extracting));
        let failed_state = PipelineState::Failed {
            kind: FailureKind::MatchingFailed,
            message: "x".to_string(),
        };
        assert_eq!(failed_state.apply(PipelineEvent::Started), Ok(PipelineState::Extracting));
    }

    #[test]
    fn test_extraction_failure_skips_matching() {
        let state = PipelineState::Extracting
            .apply(failed(FailureKind::ExtractionFailed))
            .unwrap();
        assert!(matches!(
            state,
            PipelineState::Failed {
                kind: FailureKind::ExtractionFailed,
                ..
            }
        ));
    }

    #[test]
    fn test_matching_failure() {
        let state = PipelineState::Matching
            .apply(failed(FailureKind::MatchingFailed))
            .unwrap();
        assert_eq!(state.name(), "failed");
    }

    #[test]
    fn test_invalid_transitions_are_rejected() {
        assert!(PipelineState::Idle.apply(PipelineEvent::Extracted).is_err());
        assert!(PipelineState::Idle.apply(failed(FailureKind::ExtractionFailed)).is_err());
        assert!(ready().apply(failed(FailureKind::MatchingFailed)).is_err());
        let err = PipelineState::Extracting
            .apply(PipelineEvent::Matched {
                requirement: JobRequirement::default(),
                results: vec![],
                job: None,
            })
            .unwrap_err();
        assert_eq!(
            err,
            InvalidTransition {
                from: "extracting",
                event: "matched"
            }
        );
    }

    #[test]
    fn test_state_serializes_with_status_tag() {
        let value = serde_json::to_value(PipelineState::Failed {
            kind: FailureKind::ExtractionFailed,
            message: "nope".to_string(),
        })
        .unwrap();
        assert_eq!(value["status"], "failed");
        assert_eq!(value["kind"], "extractionFailed");

        let value = serde_json::to_value(PipelineState::Idle).unwrap();
        assert_eq!(value["status"], "idle");
    }
}
