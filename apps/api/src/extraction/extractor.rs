//! Requirement extraction: turns raw job-description text into a `JobRequirement`.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::extraction::prompts::EXTRACTION_PROMPT_TEMPLATE;
use crate::extraction::requirement::{response_schema, JobRequirement, RawRequirement};
use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, NO_INVENTION_INSTRUCTION};
use crate::llm_client::{strip_json_fences, GenerationRequest, GenerativeModel, LlmError};

#[derive(Debug, Clone, Error)]
pub enum ExtractionError {
    #[error("generative service unavailable: {0}")]
    NetworkFailure(String),

    #[error("model output did not match the requirement schema: {0}")]
    SchemaMismatch(String),
}

impl From<LlmError> for ExtractionError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Parse(e) => ExtractionError::SchemaMismatch(e.to_string()),
            other => ExtractionError::NetworkFailure(other.to_string()),
        }
    }
}

/// The extraction capability. Implement this to swap providers without touching
/// the orchestrator or handlers.
///
/// Carried in `AppState` as `Arc<dyn RequirementExtractor>`.
#[async_trait]
pub trait RequirementExtractor: Send + Sync {
    async fn extract(&self, text: &str) -> Result<JobRequirement, ExtractionError>;
}

/// Extractor backed by a schema-constrained generative model call.
pub struct LlmRequirementExtractor {
    model: Arc<dyn GenerativeModel>,
    schema: Value,
}

impl LlmRequirementExtractor {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self {
            model,
            schema: response_schema(),
        }
    }
}

#[async_trait]
impl RequirementExtractor for LlmRequirementExtractor {
    async fn extract(&self, text: &str) -> Result<JobRequirement, ExtractionError> {
        let prompt = EXTRACTION_PROMPT_TEMPLATE
            .replace("{no_invention}", NO_INVENTION_INSTRUCTION)
            .replace("{job_text}", text);

        let output = self
            .model
            .generate(GenerationRequest {
                prompt: &prompt,
                system: JSON_ONLY_SYSTEM,
                response_schema: &self.schema,
            })
            .await?;
        debug!("Extraction output: {} chars", output.len());

        let requirement = parse_requirement(&output)?;
        info!(
            "Extracted requirement: {} skills, {} soft skills, {} hidden",
            requirement.skills.len(),
            requirement.soft_skills.len(),
            requirement.hidden_requirements.len()
        );
        Ok(requirement)
    }
}

/// Parses model output (optionally fenced) into a normalized requirement.
pub fn parse_requirement(output: &str) -> Result<JobRequirement, ExtractionError> {
    let body = strip_json_fences(output);
    let raw: RawRequirement = serde_json::from_str(body)
        .map_err(|e| ExtractionError::SchemaMismatch(e.to_string()))?;
    JobRequirement::from_raw(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // JD fixture: backend role
    const BACKEND_JD: &str = r#"
        Senior Go Engineer — Payments
        You will own our settlement services end to end and join the on-call rotation.
        Requirements: 5+ years building backend services, Go, PostgreSQL, Kafka.
        We value teamwork and clear written communication.
    "#;

    const GO_FIXTURE: &str = "```json\n{\"skills\":[\"Go\"],\"softSkills\":[\"teamwork\"],\"experienceYears\":{\"min\":5},\"hiddenRequirements\":[]}\n```";

    /// Returns a canned answer and records the prompt it was asked.
    struct CannedModel {
        answer: Result<String, u16>,
        seen_prompt: Mutex<Option<String>>,
        seen_schema: Mutex<Option<Value>>,
    }

    impl CannedModel {
        fn ok(answer: &str) -> Self {
            Self {
                answer: Ok(answer.to_string()),
                seen_prompt: Mutex::new(None),
                seen_schema: Mutex::new(None),
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                answer: Err(status),
                seen_prompt: Mutex::new(None),
                seen_schema: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl GenerativeModel for CannedModel {
        async fn generate(&self, request: GenerationRequest<'_>) -> Result<String, LlmError> {
            *self.seen_prompt.lock().unwrap() = Some(request.prompt.to_string());
            *self.seen_schema.lock().unwrap() = Some(request.response_schema.clone());
            match &self.answer {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(LlmError::Api {
                    status: *status,
                    message: "unavailable".to_string(),
                }),
            }
        }
    }

    #[test]
    fn test_parse_fenced_fixture() {
        let req = parse_requirement(GO_FIXTURE).unwrap();
        assert_eq!(req.skills, vec!["Go"]);
        assert_eq!(req.soft_skills, vec!["teamwork"]);
        assert_eq!(req.experience_range.min, Some(5));
        assert_eq!(req.experience_range.max, None);
        assert!(req.hidden_requirements.is_empty());
    }

    #[test]
    fn test_parse_is_deterministic() {
        assert_eq!(
            parse_requirement(GO_FIXTURE).unwrap(),
            parse_requirement(GO_FIXTURE).unwrap()
        );
    }

    #[test]
    fn test_parse_unfenced_payload() {
        let req = parse_requirement(r#"{"skills":["Rust","SQL"],"softSkills":[],"experienceYears":{},"hiddenRequirements":["Travel"]}"#).unwrap();
        assert_eq!(req.skills, vec!["Rust", "SQL"]);
        assert_eq!(req.hidden_requirements, vec!["Travel"]);
    }

    #[test]
    fn test_parse_prose_is_schema_mismatch() {
        let err = parse_requirement("Sure! Here are the skills: Go, Rust").unwrap_err();
        assert!(matches!(err, ExtractionError::SchemaMismatch(_)));
    }

    #[test]
    fn test_parse_wrong_field_type_is_schema_mismatch() {
        let err = parse_requirement(r#"{"skills":"Go"}"#).unwrap_err();
        assert!(matches!(err, ExtractionError::SchemaMismatch(_)));
    }

    #[test]
    fn test_parse_negative_years_is_schema_mismatch() {
        let err = parse_requirement(r#"{"experienceYears":{"min":-1}}"#).unwrap_err();
        assert!(matches!(err, ExtractionError::SchemaMismatch(_)));
    }

    #[tokio::test]
    async fn test_extract_sends_text_and_schema() {
        let model = Arc::new(CannedModel::ok(GO_FIXTURE));
        let extractor = LlmRequirementExtractor::new(model.clone());

        let req = extractor.extract(BACKEND_JD).await.unwrap();
        assert_eq!(req.skills, vec!["Go"]);

        let prompt = model.seen_prompt.lock().unwrap().clone().unwrap();
        assert!(prompt.contains("settlement services"));
        assert!(!prompt.contains("{job_text}"));

        let schema = model.seen_schema.lock().unwrap().clone().unwrap();
        assert_eq!(schema, response_schema());
    }

    #[tokio::test]
    async fn test_extract_maps_transport_failure() {
        let extractor = LlmRequirementExtractor::new(Arc::new(CannedModel::failing(503)));
        let err = extractor.extract(BACKEND_JD).await.unwrap_err();
        assert!(matches!(err, ExtractionError::NetworkFailure(_)));
    }

    #[tokio::test]
    async fn test_extract_is_repeatable() {
        let extractor = LlmRequirementExtractor::new(Arc::new(CannedModel::ok(GO_FIXTURE)));
        let first = extractor.extract(BACKEND_JD).await.unwrap();
        let second = extractor.extract(BACKEND_JD).await.unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_llm_parse_error_maps_to_schema_mismatch() {
        let parse_err = serde_json::from_str::<Value>("{").unwrap_err();
        let err: ExtractionError = LlmError::Parse(parse_err).into();
        assert!(matches!(err, ExtractionError::SchemaMismatch(_)));
        let err: ExtractionError = LlmError::EmptyContent.into();
        assert!(matches!(err, ExtractionError::NetworkFailure(_)));
    }
}
