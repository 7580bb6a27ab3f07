// Candidate matching: scoring a pool against a requirement, and ordering the results for display.
// Scoring never sorts; the sorter never scores.

pub mod scoring;
pub mod sorter;
