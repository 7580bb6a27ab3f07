// Requirement extraction: job-description text → structured JobRequirement.
// All generative calls go through llm_client; no direct API calls here.

pub mod extractor;
pub mod handlers;
pub mod prompts;
pub mod requirement;
