// Shared prompt fragments.
// Each stage of the interview defines its own templates in interview/prompts.rs.
// This file contains cross-cutting instructions appended to those templates.

/// Appended to every prompt whose response is parsed as a JSON object.
pub const JSON_ONLY_INSTRUCTION: &str = "\
    Respond with ONE valid JSON object only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to prompts whose response is parsed as a numbered list.
pub const NUMBERED_LIST_INSTRUCTION: &str = "\
    Return ONLY the numbered list, one item per line, formatted as \"1. ...\". \
    No headings, no commentary, no blank lines between items.";
