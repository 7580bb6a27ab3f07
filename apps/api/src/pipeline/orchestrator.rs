//! Pipeline Orchestrator: sequences extraction and matching for one session.
//!
//! Flow: [load job] → extract → fetch candidate pool → score → Ready.
//!
//! Every `run()` takes a fresh token. Only the newest token may change the visible
//! state; a superseded run still completes its calls but its outcome is dropped.
//! There is no abort of in-flight calls and no automatic retry.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::extraction::extractor::RequirementExtractor;
use crate::matching::scoring::{match_candidates, MatchScorer, MatchingError};
use crate::models::job::JobPosting;
use crate::pipeline::state::{FailureKind, PipelineEvent, PipelineState};
use crate::stores::{CandidateStore, JobStore};

/// What a run is triggered from.
#[derive(Debug, Clone, PartialEq)]
pub enum RunInput {
    Text(String),
    JobId(String),
}

/// Result of a single `run()` call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunOutcome {
    pub token: u64,
    /// False when a newer run superseded this one and its outcome was discarded.
    pub applied: bool,
    /// The visible state after this run finished.
    pub state: PipelineState,
}

pub struct PipelineOrchestrator {
    extractor: Arc<dyn RequirementExtractor>,
    candidates: Arc<dyn CandidateStore>,
    jobs: Arc<dyn JobStore>,
    scorer: Arc<dyn MatchScorer>,
    latest_token: AtomicU64,
    state: watch::Sender<PipelineState>,
}

impl PipelineOrchestrator {
    pub fn new(
        extractor: Arc<dyn RequirementExtractor>,
        candidates: Arc<dyn CandidateStore>,
        jobs: Arc<dyn JobStore>,
        scorer: Arc<dyn MatchScorer>,
    ) -> Self {
        let (state, _) = watch::channel(PipelineState::Idle);
        Self {
            extractor,
            candidates,
            jobs,
            scorer,
            latest_token: AtomicU64::new(0),
            state,
        }
    }

    /// Snapshot of the visible state.
    pub fn state(&self) -> PipelineState {
        self.state.borrow().clone()
    }

    /// Observe port: receives every visible state change.
    #[allow(dead_code)]
    pub fn subscribe(&self) -> watch::Receiver<PipelineState> {
        self.state.subscribe()
    }

    pub async fn run(&self, input: RunInput) -> RunOutcome {
        let token = self.latest_token.fetch_add(1, Ordering::SeqCst) + 1;
        info!("Pipeline run {token} started ({})", input.describe());
        self.publish(token, PipelineEvent::Started);

        let terminal = self.execute(token, input).await;
        let applied = self.publish(token, terminal);
        if applied {
            info!("Pipeline run {token} finished: {}", self.state.borrow().name());
        } else {
            debug!("Pipeline run {token} was superseded; outcome discarded");
        }

        RunOutcome {
            token,
            applied,
            state: self.state(),
        }
    }

    /// Runs the stages and returns the terminal event (`Matched` or `Failed`).
    async fn execute(&self, token: u64, input: RunInput) -> PipelineEvent {
        let (text, job) = match input {
            RunInput::Text(text) => (text, None),
            RunInput::JobId(job_id) => match self.load_job(&job_id).await {
                Ok((text, job)) => (text, Some(job)),
                Err(err) => {
                    warn!("Run {token}: {err}");
                    return PipelineEvent::Failed {
                        kind: FailureKind::MatchingFailed,
                        message: err.to_string(),
                    };
                }
            },
        };

        let requirement = match self.extractor.extract(&text).await {
            Ok(requirement) => requirement,
            Err(err) => {
                warn!("Run {token}: extraction failed: {err}");
                return PipelineEvent::Failed {
                    kind: FailureKind::ExtractionFailed,
                    message: "Could not extract requirements from the job description."
                        .to_string(),
                };
            }
        };

        self.publish(token, PipelineEvent::Extracted);

        let pool = match self.candidates.fetch_candidate_pool().await {
            Ok(pool) => pool,
            Err(err) => {
                let err = MatchingError::SourceUnavailable(err.to_string());
                warn!("Run {token}: {err}");
                return PipelineEvent::Failed {
                    kind: FailureKind::MatchingFailed,
                    message: "Could not load the candidate pool.".to_string(),
                };
            }
        };

        let results = match_candidates(self.scorer.as_ref(), &requirement, &pool);
        info!(
            "Run {token}: scored {} of {} candidates ({} scorer)",
            results.len(),
            pool.len(),
            self.scorer.backend()
        );

        PipelineEvent::Matched {
            requirement,
            results,
            job,
        }
    }

    /// Fetches the posting and its description text.
    async fn load_job(&self, job_id: &str) -> Result<(String, JobPosting), MatchingError> {
        let job = self
            .jobs
            .get_job_by_id(job_id)
            .await
            .map_err(|e| MatchingError::SourceUnavailable(e.to_string()))?
            .ok_or_else(|| MatchingError::SourceUnavailable(format!("Job {job_id} not found")))?;

        let text = job
            .description_text()
            .ok_or_else(|| {
                MatchingError::SourceUnavailable(format!("Job {job_id} has no description"))
            })?
            .to_string();
        Ok((text, job))
    }

    /// Applies `event` if `token` is still the newest run. Returns whether the state changed.
    fn publish(&self, token: u64, event: PipelineEvent) -> bool {
        self.state.send_if_modified(|state| {
            if self.latest_token.load(Ordering::SeqCst) != token {
                debug!("Dropping '{}' from superseded run {token}", event.name());
                return false;
            }
            match state.apply(event) {
                Ok(next) => {
                    *state = next;
                    true
                }
                Err(err) => {
                    warn!("Run {token}: {err}");
                    false
                }
            }
        })
    }
}

impl RunInput {
    fn describe(&self) -> String {
        match self {
            RunInput::Text(text) => format!("text, {} chars", text.len()),
            RunInput::JobId(id) => format!("job {id}"),
        }
    }
}
