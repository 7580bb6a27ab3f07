//! Matching sessions: the in-memory, per-view bundle of pipeline, sorter and interview workflow.
//!
//! Nothing here is persisted. Removing a session drops every result it held.
//! Sessions nobody has touched for the idle TTL are evicted by the sweeper.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::extraction::extractor::RequirementExtractor;
use crate::interview::scheduling::SchedulingService;
use crate::interview::workflow::{InterviewRequest, InterviewWorkflow, RequestError};
use crate::matching::scoring::MatchScorer;
use crate::matching::sorter::{ResultSorter, SortKey};
use crate::notifications::{Notification, SessionNotifications};
use crate::pipeline::orchestrator::{PipelineOrchestrator, RunInput, RunOutcome};
use crate::pipeline::state::PipelineState;
use crate::stores::{CandidateStore, JobStore};

/// Collaborators shared by every session.
#[derive(Clone)]
pub struct SessionDeps {
    pub extractor: Arc<dyn RequirementExtractor>,
    pub candidates: Arc<dyn CandidateStore>,
    pub jobs: Arc<dyn JobStore>,
    pub scorer: Arc<dyn MatchScorer>,
    pub scheduler: Arc<dyn SchedulingService>,
}

/// What the presentation layer renders: the pipeline state with Ready results in
/// display order, the active sort, and which candidates have a request outstanding.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub session_id: Uuid,
    pub busy: bool,
    pub state: PipelineState,
    pub sort: ResultSorter,
    pub requesting: Vec<String>,
}

pub struct MatchingSession {
    id: Uuid,
    pipeline: PipelineOrchestrator,
    sorter: Mutex<ResultSorter>,
    interviews: InterviewWorkflow,
    notifications: Arc<SessionNotifications>,
    last_seen: Mutex<Instant>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl MatchingSession {
    pub fn new(id: Uuid, deps: &SessionDeps) -> Self {
        let notifications = Arc::new(SessionNotifications::default());
        Self {
            id,
            pipeline: PipelineOrchestrator::new(
                deps.extractor.clone(),
                deps.candidates.clone(),
                deps.jobs.clone(),
                deps.scorer.clone(),
            ),
            sorter: Mutex::new(ResultSorter::default()),
            interviews: InterviewWorkflow::new(deps.scheduler.clone(), notifications.clone()),
            notifications,
            last_seen: Mutex::new(Instant::now()),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    fn touch(&self) {
        *lock(&self.last_seen) = Instant::now();
    }

    fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(*lock(&self.last_seen))
    }

    pub async fn run(&self, input: RunInput) -> RunOutcome {
        let mut outcome = self.pipeline.run(input).await;
        outcome.state = self.sorted(outcome.state);
        outcome
    }

    pub fn sort_by(&self, key: SortKey) -> ResultSorter {
        let mut sorter = lock(&self.sorter);
        sorter.sort_by(key);
        *sorter
    }

    pub fn view(&self) -> SessionView {
        let state = self.sorted(self.pipeline.state());
        let requesting = match &state {
            PipelineState::Ready { results, .. } => results
                .iter()
                .filter(|r| self.interviews.is_requesting(&r.candidate_id))
                .map(|r| r.candidate_id.clone())
                .collect(),
            _ => Vec::new(),
        };
        SessionView {
            session_id: self.id,
            busy: state.is_busy(),
            state,
            sort: *lock(&self.sorter),
            requesting,
        }
    }

    /// Submits an interview request, naming the candidate from the current results when possible.
    pub async fn request_interview(&self, request: InterviewRequest) -> Result<(), RequestError> {
        let candidate_name = self
            .candidate_name(&request.candidate_id)
            .unwrap_or_else(|| request.candidate_id.clone());
        self.interviews
            .request_interview(request, &candidate_name)
            .await
    }

    pub fn interviews(&self) -> &InterviewWorkflow {
        &self.interviews
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.snapshot()
    }

    fn candidate_name(&self, candidate_id: &str) -> Option<String> {
        match self.pipeline.state() {
            PipelineState::Ready { results, .. } => results
                .into_iter()
                .find(|r| r.candidate_id == candidate_id)
                .map(|r| r.name),
            _ => None,
        }
    }

    fn sorted(&self, state: PipelineState) -> PipelineState {
        match state {
            PipelineState::Ready {
                requirement,
                results,
                job,
            } => PipelineState::Ready {
                results: lock(&self.sorter).apply(&results),
                requirement,
                job,
            },
            other => other,
        }
    }
}

/// Live sessions allowed when no limit is configured.
pub const DEFAULT_MAX_SESSIONS: usize = 1_000;

#[derive(Debug, Error, PartialEq)]
#[error("session limit of {0} reached")]
pub struct SessionLimitReached(pub usize);

/// All live sessions, keyed by id.
pub struct SessionRegistry {
    sessions: Mutex<HashMap<Uuid, Arc<MatchingSession>>>,
    max_sessions: usize,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::with_limit(DEFAULT_MAX_SESSIONS)
    }
}

impl SessionRegistry {
    pub fn with_limit(max_sessions: usize) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            max_sessions,
        }
    }

    pub fn create(&self, deps: &SessionDeps) -> Result<Arc<MatchingSession>, SessionLimitReached> {
        let mut sessions = lock(&self.sessions);
        if sessions.len() >= self.max_sessions {
            warn!("Session limit of {} reached; refusing new session", self.max_sessions);
            return Err(SessionLimitReached(self.max_sessions));
        }
        let session = Arc::new(MatchingSession::new(Uuid::new_v4(), deps));
        sessions.insert(session.id(), session.clone());
        info!("Session {} created", session.id());
        Ok(session)
    }

    /// Looks up a session and marks it as recently used.
    pub fn get(&self, id: Uuid) -> Option<Arc<MatchingSession>> {
        let session = lock(&self.sessions).get(&id).cloned()?;
        session.touch();
        Some(session)
    }

    /// Drops a session and all of its transient state. Runs still in flight finish
    /// against the detached session and are never observed.
    pub fn remove(&self, id: Uuid) -> bool {
        let removed = lock(&self.sessions).remove(&id).is_some();
        if removed {
            info!("Session {id} discarded");
        }
        removed
    }

    pub fn len(&self) -> usize {
        lock(&self.sessions).len()
    }

    /// Drops every session idle for longer than `ttl`. Returns how many were evicted.
    pub fn evict_idle(&self, ttl: Duration) -> usize {
        let now = Instant::now();
        let mut sessions = lock(&self.sessions);
        let before = sessions.len();
        sessions.retain(|id, session| {
            let keep = session.idle_for(now) <= ttl;
            if !keep {
                debug!("Session {id} idle past {ttl:?}; evicting");
            }
            keep
        });
        before - sessions.len()
    }
}

/// Periodically evicts idle sessions. The sweep runs at a quarter of the TTL, at most once a second.
pub fn spawn_idle_sweeper(registry: Arc<SessionRegistry>, ttl: Duration) -> JoinHandle<()> {
    let period = (ttl / 4).max(Duration::from_secs(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let evicted = registry.evict_idle(ttl);
            if evicted > 0 {
                info!("Evicted {evicted} idle session(s); {} live", registry.len());
            }
        }
    })
}
