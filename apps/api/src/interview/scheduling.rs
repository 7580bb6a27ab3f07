use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use crate::interview::workflow::InterviewRequest;

const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum SchedulingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("scheduling service rejected request (status {status}): {message}")]
    Rejected { status: u16, message: String },
}

/// Outbound port to the interview scheduling service. The service does not
/// deduplicate; callers must ensure a request is sent once.
#[async_trait]
pub trait SchedulingService: Send + Sync {
    async fn submit(&self, request: &InterviewRequest) -> Result<(), SchedulingError>;
}

/// Scheduling service reached over HTTP: `POST {base_url}/interviews` with a JSON body.
#[derive(Clone)]
pub struct HttpSchedulingService {
    client: Client,
    base_url: String,
}

impl HttpSchedulingService {
    pub fn new(base_url: String) -> Result<Self, SchedulingError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()?,
            base_url,
        })
    }
}

#[async_trait]
impl SchedulingService for HttpSchedulingService {
    async fn submit(&self, request: &InterviewRequest) -> Result<(), SchedulingError> {
        let response = self
            .client
            .post(format!("{}/interviews", self.base_url))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SchedulingError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        debug!(
            "Interview request accepted for candidate {} (job {})",
            request.candidate_id, request.job_id
        );
        Ok(())
    }
}
