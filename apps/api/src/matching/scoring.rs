//! Match Scoring: pluggable, trait-based scorer that ranks a candidate pool against a requirement.
//!
//! Default: `KeywordMatchScorer` (pure-Rust, fast, deterministic, fully testable).
//!
//! `AppState` holds an `Arc<dyn MatchScorer>`, swapped at startup.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::extraction::requirement::{ExperienceRange, JobRequirement};
use crate::models::candidate::CandidateProfile;

/// Fit credited when the requirement states a range but the candidate declared no experience.
const UNKNOWN_EXPERIENCE_FIT: f64 = 0.5;
/// Fit credited when the candidate exceeds the stated maximum.
const OVER_MAX_EXPERIENCE_FIT: f64 = 0.75;

#[derive(Debug, Clone, Error)]
pub enum MatchingError {
    #[error("match source unavailable: {0}")]
    SourceUnavailable(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Output data model
// ────────────────────────────────────────────────────────────────────────────

/// A single candidate scored against a requirement. Created fresh per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub candidate_id: String,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    /// 0 – 100
    pub match_score: u32,
    /// Requirement skills the candidate has, in requirement order.
    pub matching_skills: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// The match scorer trait. Implementations must be deterministic and monotonic in
/// the candidate's matching skills.
pub trait MatchScorer: Send + Sync {
    fn score(&self, requirement: &JobRequirement, candidate: &CandidateProfile) -> MatchResult;

    /// Backend label for logs.
    fn backend(&self) -> &'static str;
}

/// Scores every candidate in the pool. Order follows the pool; sorting is a presentation concern.
///
/// An empty pool or a requirement without technical skills yields no results.
pub fn match_candidates(
    scorer: &dyn MatchScorer,
    requirement: &JobRequirement,
    pool: &[CandidateProfile],
) -> Vec<MatchResult> {
    if requirement.skills.is_empty() || pool.is_empty() {
        return Vec::new();
    }
    pool.iter()
        .map(|candidate| scorer.score(requirement, candidate))
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// KeywordMatchScorer: default implementation
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ScoringWeights {
    pub technical: f64,
    pub soft: f64,
    pub experience: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            technical: 0.7,
            soft: 0.2,
            experience: 0.1,
        }
    }
}

/// Skill-overlap scorer.
///
/// Algorithm:
/// 1. technical = |req.skills ∩ candidate.skills| / |req.skills|
/// 2. soft = |req.softSkills ∩ candidate.skills| / |req.softSkills|
/// 3. experience = 1.0 inside the range, years/min below it, 0.75 above max, 0.5 if undeclared
/// 4. score = Σ(weight × dimension) × 100, rounded. A dimension the requirement does not
///    specify gives its weight to the technical dimension.
#[derive(Debug, Clone, Default)]
pub struct KeywordMatchScorer {
    weights: ScoringWeights,
}

impl MatchScorer for KeywordMatchScorer {
    fn score(&self, requirement: &JobRequirement, candidate: &CandidateProfile) -> MatchResult {
        let candidate_skills: HashSet<String> =
            candidate.skills.iter().map(|s| normalize_skill(s)).collect();
        let has = |skill: &str| candidate_skills.contains(&normalize_skill(skill));

        let matching_skills: Vec<String> =
            requirement.skills.iter().filter(|s| has(s.as_str())).cloned().collect();
        let soft_matched = requirement.soft_skills.iter().filter(|s| has(s.as_str())).count();

        let mut technical_weight = self.weights.technical;
        let mut total = 0.0;

        if requirement.soft_skills.is_empty() {
            technical_weight += self.weights.soft;
        } else {
            total += self.weights.soft * ratio(soft_matched, requirement.soft_skills.len());
        }

        if requirement.experience_range.is_unbounded() {
            technical_weight += self.weights.experience;
        } else {
            total += self.weights.experience
                * experience_fit(&requirement.experience_range, candidate.experience_years);
        }

        total += technical_weight * ratio(matching_skills.len(), requirement.skills.len());

        let weight_sum = self.weights.technical + self.weights.soft + self.weights.experience;
        let normalized = if weight_sum > 0.0 { total / weight_sum } else { 0.0 };
        let match_score = (normalized * 100.0).round().clamp(0.0, 100.0) as u32;

        MatchResult {
            candidate_id: candidate.id.clone(),
            name: candidate.name.clone(),
            email: candidate.email.clone(),
            avatar_url: candidate.avatar_url.clone(),
            match_score,
            matching_skills,
        }
    }

    fn backend(&self) -> &'static str {
        "keyword"
    }
}

/// Case-insensitive comparison key with collapsed whitespace.
pub fn normalize_skill(skill: &str) -> String {
    skill
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn ratio(matched: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        matched as f64 / total as f64
    }
}

fn experience_fit(range: &ExperienceRange, years: Option<u32>) -> f64 {
    let Some(years) = years else {
        return UNKNOWN_EXPERIENCE_FIT;
    };
    if let Some(min) = range.min {
        if years < min {
            return years as f64 / min as f64;
        }
    }
    match range.max {
        Some(max) if years > max => OVER_MAX_EXPERIENCE_FIT,
        _ => 1.0,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
