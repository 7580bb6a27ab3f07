// Shared prompt constants and prompt-building utilities.
// Each service that needs generative calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only, matching the provided response schema. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Instruction that keeps extracted lists faithful to the source text.
pub const NO_INVENTION_INSTRUCTION: &str = "\
    Only list skills that are stated or clearly implied by the text. \
    Use the wording of the source text for each skill, one skill per entry, \
    without version numbers or proficiency qualifiers.";
