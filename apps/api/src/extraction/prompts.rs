pub const EXTRACTION_PROMPT_TEMPLATE: &str = r#"Analyze the following job description and extract the hiring requirements.

Return a JSON object with these fields:
- "skills": technical skills, tools, languages and frameworks the role needs, most important first
- "softSkills": interpersonal and behavioural skills (communication, teamwork, ownership, ...)
- "experienceYears": an object with optional integer "min" and "max" years of professional experience; omit a bound the text does not state
- "hiddenRequirements": requirements that are implied but not stated outright (e.g. "on-call rotation" implies "comfortable with production incidents")

{no_invention}

Job description:
"""
{job_text}
""""#;
