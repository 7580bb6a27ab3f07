use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use crate::models::candidate::{CandidateProfile, CandidateRow};
use crate::models::job::JobPosting;
use crate::stores::{CandidateStore, JobStore, StoreError};

/// Candidate pool backed by the `candidates` table.
#[derive(Clone)]
pub struct PgCandidateStore {
    pool: PgPool,
}

impl PgCandidateStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CandidateStore for PgCandidateStore {
    async fn fetch_candidate_pool(&self) -> Result<Vec<CandidateProfile>, StoreError> {
        let rows = sqlx::query_as::<_, CandidateRow>(
            r#"
            SELECT id, name, email, avatar_url, skills, experience_years
            FROM candidates
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!("Fetched candidate pool: {} candidates", rows.len());
        Ok(rows.into_iter().map(CandidateProfile::from).collect())
    }
}

/// Job lookup backed by the `jobs` table.
#[derive(Clone)]
pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn get_job_by_id(&self, id: &str) -> Result<Option<JobPosting>, StoreError> {
        let job = sqlx::query_as::<_, JobPosting>(
            "SELECT id, title, company_name, description FROM jobs WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(job)
    }
}
