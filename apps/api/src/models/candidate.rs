use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row shape of the externally owned `candidates` table.
#[derive(Debug, Clone, FromRow)]
pub struct CandidateRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub skills: Vec<String>,
    pub experience_years: Option<i32>,
}

/// Read-only view of a candidate used as matching input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub skills: Vec<String>,
    pub experience_years: Option<u32>,
}

impl From<CandidateRow> for CandidateProfile {
    fn from(row: CandidateRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            avatar_url: row.avatar_url,
            skills: row.skills,
            // Negative values are data-entry noise, not "zero years".
            experience_years: row.experience_years.and_then(|y| u32::try_from(y).ok()),
        }
    }
}
