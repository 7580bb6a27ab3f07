//! Read-only adapters over the externally owned candidate and job stores.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::candidate::CandidateProfile;
use crate::models::job::JobPosting;

pub mod postgres;

pub use postgres::{PgCandidateStore, PgJobStore};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Source of the candidate pool that every pipeline run matches against.
#[async_trait]
pub trait CandidateStore: Send + Sync {
    async fn fetch_candidate_pool(&self) -> Result<Vec<CandidateProfile>, StoreError>;
}

/// Lookup of job postings for runs triggered by job id.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn get_job_by_id(&self, id: &str) -> Result<Option<JobPosting>, StoreError>;
}
