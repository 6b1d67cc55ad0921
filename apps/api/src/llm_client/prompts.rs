// Shared prompt fragments. Each service that needs LLM calls defines its own
// prompts.rs alongside it; this file holds the cross-cutting pieces.

/// Output contract appended to every prompt that expects a JSON object back.
pub const JSON_ONLY_INSTRUCTION: &str = "\
Return ONLY a valid JSON object.
Do not include any explanation.
Do not include markdown.
Do not wrap with ```json.";
