//! Result sorter: presentation ordering over ranked results, independent of scoring.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::matching::scoring::MatchResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    MatchScore,
    Name,
    Email,
    CandidateId,
    MatchingSkillCount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Active sort column and direction. Defaults to best match first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSorter {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for ResultSorter {
    fn default() -> Self {
        Self {
            key: SortKey::MatchScore,
            direction: SortDirection::Desc,
        }
    }
}

impl ResultSorter {
    /// Activates `key`: the active key flips direction, any other key starts ascending.
    pub fn sort_by(&mut self, key: SortKey) {
        if self.key == key {
            self.direction = self.direction.flipped();
        } else {
            self.key = key;
            self.direction = SortDirection::Asc;
        }
    }

    /// Returns the results in display order. Ties keep their input order in both directions.
    pub fn apply(&self, results: &[MatchResult]) -> Vec<MatchResult> {
        let mut sorted = results.to_vec();
        sorted.sort_by(|a, b| {
            let ordering = compare(self.key, a, b);
            match self.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
        sorted
    }
}

fn compare(key: SortKey, a: &MatchResult, b: &MatchResult) -> Ordering {
    match key {
        SortKey::MatchScore => a.match_score.cmp(&b.match_score),
        SortKey::Name => a.name.cmp(&b.name),
        SortKey::Email => a.email.cmp(&b.email),
        SortKey::CandidateId => a.candidate_id.cmp(&b.candidate_id),
        SortKey::MatchingSkillCount => a.matching_skills.len().cmp(&b.matching_skills.len()),
    }
}
