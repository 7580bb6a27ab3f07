//! Interview request workflow: captures scheduling details for one candidate and submits them.
//!
//! The scheduling service does not deduplicate, so this workflow enforces at most one
//! outstanding request per candidate. Form drafts survive failed submissions.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::interview::scheduling::SchedulingService;
use crate::notifications::{NotificationVariant, Notifier};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum RequestError {
    #[error("scheduling service unavailable: {0}")]
    NetworkFailure(String),

    #[error("{0}")]
    ValidationFailure(String),

    #[error("an interview request for candidate {0} is already in progress")]
    AlreadyInFlight(String),
}

/// Payload sent to the scheduling service. Built on confirm, sent once, not retained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewRequest {
    pub job_id: String,
    pub candidate_id: String,
    pub company_name: String,
    pub scheduled_time: String,
    pub location: String,
}

impl InterviewRequest {
    fn validate(&self) -> Result<(), RequestError> {
        let mut missing = Vec::new();
        if self.scheduled_time.trim().is_empty() {
            missing.push("scheduledTime");
        }
        if self.location.trim().is_empty() {
            missing.push("location");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(RequestError::ValidationFailure(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )))
        }
    }
}

/// Draft of the scheduling form for one candidate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewForm {
    pub scheduled_time: String,
    pub location: String,
}

pub struct InterviewWorkflow {
    scheduler: Arc<dyn SchedulingService>,
    notifier: Arc<dyn Notifier>,
    in_flight: Mutex<HashSet<String>>,
    forms: Mutex<HashMap<String, InterviewForm>>,
}

/// Holds a candidate's in-flight marker; releasing happens on drop so a cancelled
/// submission never leaves the candidate locked.
struct InFlightGuard<'a> {
    markers: &'a Mutex<HashSet<String>>,
    candidate_id: String,
}

impl<'a> InFlightGuard<'a> {
    fn claim(markers: &'a Mutex<HashSet<String>>, candidate_id: &str) -> Option<Self> {
        let inserted = lock(markers).insert(candidate_id.to_string());
        inserted.then(|| Self {
            markers,
            candidate_id: candidate_id.to_string(),
        })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        lock(self.markers).remove(&self.candidate_id);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl InterviewWorkflow {
    pub fn new(scheduler: Arc<dyn SchedulingService>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            scheduler,
            notifier,
            in_flight: Mutex::new(HashSet::new()),
            forms: Mutex::new(HashMap::new()),
        }
    }

    /// Opens (or reopens) the form for a candidate, returning any retained draft.
    pub fn open_form(&self, candidate_id: &str) -> InterviewForm {
        lock(&self.forms)
            .entry(candidate_id.to_string())
            .or_default()
            .clone()
    }

    pub fn update_form(&self, candidate_id: &str, form: InterviewForm) {
        lock(&self.forms).insert(candidate_id.to_string(), form);
    }

    pub fn close_form(&self, candidate_id: &str) {
        lock(&self.forms).remove(candidate_id);
    }

    #[allow(dead_code)]
    pub fn form(&self, candidate_id: &str) -> Option<InterviewForm> {
        lock(&self.forms).get(candidate_id).cloned()
    }

    /// Whether the request action for this candidate is disabled.
    pub fn is_requesting(&self, candidate_id: &str) -> bool {
        lock(&self.in_flight).contains(candidate_id)
    }

    /// Validates and submits an interview request.
    ///
    /// Validation and the duplicate check both happen before any network call.
    pub async fn request_interview(
        &self,
        request: InterviewRequest,
        candidate_name: &str,
    ) -> Result<(), RequestError> {
        if let Err(err) = request.validate() {
            self.notifier.notify(
                "Missing details",
                "Please provide both a time and a location for the interview.",
                NotificationVariant::Destructive,
            );
            return Err(err);
        }

        let Some(_guard) = InFlightGuard::claim(&self.in_flight, &request.candidate_id) else {
            warn!(
                "Duplicate interview request for candidate {} rejected",
                request.candidate_id
            );
            return Err(RequestError::AlreadyInFlight(request.candidate_id));
        };

        // Keep what was submitted so a failure can be resubmitted as-is.
        self.update_form(
            &request.candidate_id,
            InterviewForm {
                scheduled_time: request.scheduled_time.clone(),
                location: request.location.clone(),
            },
        );

        // The marker is held until the form and notification reflect this outcome.
        match self.scheduler.submit(&request).await {
            Ok(()) => {
                info!(
                    "Interview requested for candidate {} (job {})",
                    request.candidate_id, request.job_id
                );
                self.close_form(&request.candidate_id);
                self.notifier.notify(
                    "Interview requested",
                    &format!("Interview request sent to {candidate_name}."),
                    NotificationVariant::Default,
                );
                Ok(())
            }
            Err(err) => {
                warn!(
                    "Interview request for candidate {} failed: {err}",
                    request.candidate_id
                );
                self.notifier.notify(
                    "Request failed",
                    "Could not send the interview request. Please try again.",
                    NotificationVariant::Destructive,
                );
                Err(RequestError::NetworkFailure(err.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::scheduling::SchedulingError;
    use crate::notifications::SessionNotifications;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{OnceLock, Weak};
    use tokio::sync::Notify;

    /// Counts submissions. When gated, each submit parks until `release` is notified.
    #[derive(Default)]
    struct FakeScheduler {
        calls: AtomicUsize,
        fail: bool,
        gated: bool,
        entered: Notify,
        release: Notify,
    }

    #[async_trait]
    impl SchedulingService for FakeScheduler {
        async fn submit(&self, _request: &InterviewRequest) -> Result<(), SchedulingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.gated {
                self.entered.notify_one();
                self.release.notified().await;
            }
            if self.fail {
                Err(SchedulingError::Rejected {
                    status: 503,
                    message: "down".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    fn request(candidate_id: &str) -> InterviewRequest {
        InterviewRequest {
            job_id: "job-1".to_string(),
            candidate_id: candidate_id.to_string(),
            company_name: "Acme".to_string(),
            scheduled_time: "2026-11-02T10:00".to_string(),
            location: "Berlin office".to_string(),
        }
    }

    fn workflow(
        scheduler: Arc<FakeScheduler>,
    ) -> (Arc<InterviewWorkflow>, Arc<SessionNotifications>) {
        let notes = Arc::new(SessionNotifications::default());
        let wf = Arc::new(InterviewWorkflow::new(scheduler, notes.clone()));
        (wf, notes)
    }

    #[tokio::test]
    async fn test_success_notifies_with_name_and_closes_form() {
        let scheduler = Arc::new(FakeScheduler::default());
        let (wf, notes) = workflow(scheduler.clone());
        wf.open_form("c1");

        wf.request_interview(request("c1"), "Grace Hopper").await.unwrap();

        assert_eq!(scheduler.calls.load(Ordering::SeqCst), 1);
        assert!(!wf.is_requesting("c1"));
        assert!(wf.form("c1").is_none());
        let snapshot = notes.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert!(snapshot[0].description.contains("Grace Hopper"));
        assert_eq!(snapshot[0].variant, NotificationVariant::Default);
    }

    #[tokio::test]
    async fn test_failure_keeps_form_and_clears_marker() {
        let scheduler = Arc::new(FakeScheduler {
            fail: true,
            ..Default::default()
        });
        let (wf, notes) = workflow(scheduler.clone());

        let err = wf.request_interview(request("c1"), "Grace").await.unwrap_err();

        assert!(matches!(err, RequestError::NetworkFailure(_)));
        assert!(!wf.is_requesting("c1"));
        let form = wf.form("c1").unwrap();
        assert_eq!(form.location, "Berlin office");
        assert_eq!(form.scheduled_time, "2026-11-02T10:00");
        assert_eq!(notes.snapshot()[0].variant, NotificationVariant::Destructive);
        assert!(!notes.snapshot()[0].description.contains("Grace"));
    }

    #[tokio::test]
    async fn test_missing_fields_rejected_before_network() {
        let scheduler = Arc::new(FakeScheduler::default());
        let (wf, _notes) = workflow(scheduler.clone());

        let mut blank_time = request("c1");
        blank_time.scheduled_time = "   ".to_string();
        let mut blank_location = request("c2");
        blank_location.location.clear();

        let err = wf.request_interview(blank_time, "A").await.unwrap_err();
        assert!(matches!(err, RequestError::ValidationFailure(ref m) if m.contains("scheduledTime")));
        let err = wf.request_interview(blank_location, "B").await.unwrap_err();
        assert!(matches!(err, RequestError::ValidationFailure(ref m) if m.contains("location")));

        assert_eq!(scheduler.calls.load(Ordering::SeqCst), 0);
        assert!(!wf.is_requesting("c1"));
    }

    #[tokio::test]
    async fn test_duplicate_request_is_rejected_locally() {
        let scheduler = Arc::new(FakeScheduler {
            gated: true,
            ..Default::default()
        });
        let (wf, _notes) = workflow(scheduler.clone());

        let first = tokio::spawn({
            let wf = wf.clone();
            async move { wf.request_interview(request("c1"), "Grace").await }
        });
        scheduler.entered.notified().await;
        assert!(wf.is_requesting("c1"));

        let second = wf.request_interview(request("c1"), "Grace").await;
        assert_eq!(second, Err(RequestError::AlreadyInFlight("c1".to_string())));

        scheduler.release.notify_one();
        first.await.unwrap().unwrap();

        assert_eq!(scheduler.calls.load(Ordering::SeqCst), 1);
        assert!(!wf.is_requesting("c1"));
    }

    #[tokio::test]
    async fn test_other_candidates_are_not_blocked() {
        let scheduler = Arc::new(FakeScheduler {
            gated: true,
            ..Default::default()
        });
        let (wf, _notes) = workflow(scheduler.clone());

        let first = tokio::spawn({
            let wf = wf.clone();
            async move { wf.request_interview(request("c1"), "Grace").await }
        });
        scheduler.entered.notified().await;

        let second = tokio::spawn({
            let wf = wf.clone();
            async move { wf.request_interview(request("c2"), "Alan").await }
        });
        scheduler.entered.notified().await;
        assert!(wf.is_requesting("c1"));
        assert!(wf.is_requesting("c2"));

        scheduler.release.notify_one();
        scheduler.release.notify_one();
        first.await.unwrap().unwrap();
        second.await.unwrap().unwrap();
        assert_eq!(scheduler.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_resubmit_after_failure_is_allowed() {
        let scheduler = Arc::new(FakeScheduler {
            fail: true,
            ..Default::default()
        });
        let (wf, _notes) = workflow(scheduler.clone());

        assert!(wf.request_interview(request("c1"), "Grace").await.is_err());
        assert!(wf.request_interview(request("c1"), "Grace").await.is_err());
        assert_eq!(scheduler.calls.load(Ordering::SeqCst), 2);
    }

    /// Records, for each notification, whether the candidate was still marked in flight
    /// and whether a draft form existed at that moment.
    #[derive(Default)]
    struct ObservingNotifier {
        workflow: OnceLock<Weak<InterviewWorkflow>>,
        candidate_id: String,
        seen: Mutex<Vec<(String, bool, bool)>>,
    }

    impl Notifier for ObservingNotifier {
        fn notify(&self, title: &str, _description: &str, _variant: NotificationVariant) {
            let wf = self.workflow.get().and_then(Weak::upgrade).unwrap();
            let requesting = wf.is_requesting(&self.candidate_id);
            let has_form = wf.form(&self.candidate_id).is_some();
            lock(&self.seen).push((title.to_string(), requesting, has_form));
        }
    }

    fn observed_workflow(
        scheduler: Arc<FakeScheduler>,
    ) -> (Arc<InterviewWorkflow>, Arc<ObservingNotifier>) {
        let notifier = Arc::new(ObservingNotifier {
            candidate_id: "c1".to_string(),
            ..Default::default()
        });
        let wf = Arc::new(InterviewWorkflow::new(scheduler, notifier.clone()));
        notifier.workflow.set(Arc::downgrade(&wf)).unwrap();
        (wf, notifier)
    }

    #[tokio::test]
    async fn test_success_closes_form_before_releasing_marker() {
        let (wf, notifier) = observed_workflow(Arc::new(FakeScheduler::default()));

        wf.request_interview(request("c1"), "Grace").await.unwrap();

        assert_eq!(
            *lock(&notifier.seen),
            vec![("Interview requested".to_string(), true, false)]
        );
        assert!(!wf.is_requesting("c1"));
    }

    #[tokio::test]
    async fn test_failure_keeps_form_while_marker_is_held() {
        let (wf, notifier) = observed_workflow(Arc::new(FakeScheduler {
            fail: true,
            ..Default::default()
        }));

        assert!(wf.request_interview(request("c1"), "Grace").await.is_err());

        assert_eq!(
            *lock(&notifier.seen),
            vec![("Request failed".to_string(), true, true)]
        );
        assert!(!wf.is_requesting("c1"));
        assert!(wf.form("c1").is_some());
    }

    #[test]
    fn test_form_lifecycle() {
        let (wf, _notes) = workflow(Arc::new(FakeScheduler::default()));
        assert_eq!(wf.open_form("c1"), InterviewForm::default());
        wf.update_form(
            "c1",
            InterviewForm {
                scheduled_time: "tomorrow 9am".to_string(),
                location: String::new(),
            },
        );
        assert_eq!(wf.open_form("c1").scheduled_time, "tomorrow 9am");
        wf.close_form("c1");
        assert!(wf.form("c1").is_none());
    }
}
