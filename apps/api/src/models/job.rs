use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A job posting from the externally owned `jobs` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    pub id: String,
    pub title: String,
    pub company_name: String,
    pub description: Option<String>,
}

impl JobPosting {
    /// The description text, if it has any non-whitespace content.
    pub fn description_text(&self) -> Option<&str> {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }
}
