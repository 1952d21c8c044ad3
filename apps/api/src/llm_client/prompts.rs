// Cross-cutting prompt fragments. Each module that calls the provider keeps
// its own prompts.rs alongside it.

/// Closing instruction for free-text prompts.
pub const PLAIN_TEXT_RULE: &str = "Generate the output in plain text only with the above structure. \
    Do NOT use markdown. Do NOT add commentary before or after it.";

/// Closing instruction for JSON-mode prompts.
pub const JSON_ONLY_RULE: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";
