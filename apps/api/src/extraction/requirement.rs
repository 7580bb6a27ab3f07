//! Requirement model: the structured shape extracted from a job description.
//!
//! The wire shape (camelCase, `experienceYears`) is the only structural contract
//! with the generative model and is mirrored by `response_schema()`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::extraction::extractor::ExtractionError;
use crate::matching::scoring::normalize_skill;

/// Years-of-experience bounds. Either bound may be absent independently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
}

impl ExperienceRange {
    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// Structured hiring requirements for a single job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRequirement {
    /// Technical skills, in the order the model ranked them. No duplicates.
    pub skills: Vec<String>,
    pub soft_skills: Vec<String>,
    #[serde(rename = "experienceYears", default)]
    pub experience_range: ExperienceRange,
    pub hidden_requirements: Vec<String>,
}

/// Lenient mirror of the model's output. Nulls and missing fields are tolerated here
/// and normalized by `JobRequirement::from_raw`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawRequirement {
    #[serde(default)]
    skills: Option<Vec<String>>,
    #[serde(default)]
    soft_skills: Option<Vec<String>>,
    #[serde(default)]
    experience_years: Option<ExperienceRange>,
    #[serde(default)]
    hidden_requirements: Option<Vec<String>>,
}

impl JobRequirement {
    /// Normalizes a raw model payload into a requirement.
    ///
    /// Rejects `min > max`: an inverted range cannot be matched against meaningfully.
    pub(crate) fn from_raw(raw: RawRequirement) -> Result<Self, ExtractionError> {
        let experience_range = raw.experience_years.unwrap_or_default();
        if let (Some(min), Some(max)) = (experience_range.min, experience_range.max) {
            if min > max {
                return Err(ExtractionError::SchemaMismatch(format!(
                    "experienceYears.min ({min}) exceeds experienceYears.max ({max})"
                )));
            }
        }

        Ok(Self {
            skills: ordered_set(raw.skills.unwrap_or_default()),
            soft_skills: ordered_set(raw.soft_skills.unwrap_or_default()),
            experience_range,
            hidden_requirements: raw
                .hidden_requirements
                .unwrap_or_default()
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        })
    }
}

/// Trims entries, drops blanks and duplicates under the matching comparison key,
/// keeping first occurrence.
fn ordered_set(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && seen.insert(normalize_skill(s)))
        .collect()
}

/// Structured-output schema sent with every extraction request.
pub fn response_schema() -> Value {
    let string_list = |description: &str| {
        json!({
            "type": "ARRAY",
            "items": { "type": "STRING" },
            "description": description,
        })
    };

    json!({
        "type": "OBJECT",
        "properties": {
            "skills": string_list("Technical skills required for the role"),
            "softSkills": string_list("Soft skills required for the role"),
            "experienceYears": {
                "type": "OBJECT",
                "properties": {
                    "min": { "type": "INTEGER", "nullable": true },
                    "max": { "type": "INTEGER", "nullable": true },
                },
                "description": "Required years of professional experience",
            },
            "hiddenRequirements": string_list("Requirements implied but not stated in the text"),
        },
        "required": ["skills", "softSkills", "experienceYears", "hiddenRequirements"],
    })
}
