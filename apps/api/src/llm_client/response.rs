// Tolerant extraction of structured payloads from free-form model output.
//
// Model output is not guaranteed to be clean. Both extractors accept surrounding
// prose and either recover the payload or fail with a `ResponseParseError`; they
// never hand back a partially-parsed value.

use serde_json::{Map, Value};
use thiserror::Error;

/// Maximum number of entries kept by `extract_numbered_list`.
pub const MAX_LIST_ITEMS: usize = 5;
/// Lines with this many characters or fewer are dropped as headings or artifacts.
pub const MIN_LIST_ITEM_CHARS: usize = 10;

#[derive(Debug, Error)]
pub enum ResponseParseError {
    #[error("no JSON object found in model output")]
    NoJsonObject,

    #[error("model output contains malformed JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("model output JSON is not an object")]
    NotAnObject,
}

/// Parses the span from the first `{` to the last `}` as a JSON object.
pub fn extract_json_object(text: &str) -> Result<Map<String, Value>, ResponseParseError> {
    let start = text.find('{').ok_or(ResponseParseError::NoJsonObject)?;
    let end = text.rfind('}').ok_or(ResponseParseError::NoJsonObject)?;
    if end < start {
        return Err(ResponseParseError::NoJsonObject);
    }

    match serde_json::from_str::<Value>(&text[start..=end])? {
        Value::Object(map) => Ok(map),
        _ => Err(ResponseParseError::NotAnObject),
    }
}

/// Splits output into lines, strips `N.` / `N)` enumerators, drops short lines,
/// and keeps at most `MAX_LIST_ITEMS` entries in their original order.
pub fn extract_numbered_list(text: &str) -> Vec<String> {
    text.lines()
        .map(strip_enumerator)
        .filter(|line| line.chars().count() > MIN_LIST_ITEM_CHARS)
        .take(MAX_LIST_ITEMS)
        .map(String::from)
        .collect()
}

fn strip_enumerator(line: &str) -> &str {
    let line = line.trim();
    let rest = line.trim_start_matches(|c: char| c.is_ascii_digit());
    if rest.len() == line.len() {
        return line;
    }
    match rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
        Some(stripped) => stripped.trim(),
        None => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_recovered_from_surrounding_prose() {
        let text = "Sure! Here is the evaluation:\n{\"score\": 7, \"verdict\": \"ADEQUATE\"}\nHope that helps.";
        let map = extract_json_object(text).unwrap();
        assert_eq!(map.get("score"), Some(&Value::from(7)));
        assert_eq!(map.get("verdict"), Some(&Value::from("ADEQUATE")));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_object_recovered_from_code_fence() {
        let text = "```json\n{\"name\": \"Ada\", \"skills\": [\"Rust\"]}\n```";
        let map = extract_json_object(text).unwrap();
        assert_eq!(map["name"], "Ada");
        assert_eq!(map["skills"][0], "Rust");
    }

    #[test]
    fn test_nested_braces_use_outermost_span() {
        let text = "result: {\"outer\": {\"inner\": 1}} done";
        let map = extract_json_object(text).unwrap();
        assert_eq!(map["outer"]["inner"], 1);
    }

    #[test]
    fn test_no_braces_is_no_json_object() {
        let err = extract_json_object("I cannot evaluate this answer.").unwrap_err();
        assert!(matches!(err, ResponseParseError::NoJsonObject));
    }

    #[test]
    fn test_reversed_braces_is_no_json_object() {
        let err = extract_json_object("} oops {").unwrap_err();
        assert!(matches!(err, ResponseParseError::NoJsonObject));
    }

    #[test]
    fn test_malformed_span_is_invalid_json() {
        let err = extract_json_object("{\"score\": 7,, }").unwrap_err();
        assert!(matches!(err, ResponseParseError::InvalidJson(_)));
    }

    #[test]
    fn test_list_drops_short_lines_and_keeps_order() {
        let text = "1. Alpha\n2. Beta\nshort\n3. Gamma is a long enough line";
        let items = extract_numbered_list(text);
        assert_eq!(items, vec!["Gamma is a long enough line".to_string()]);
    }

    #[test]
    fn test_list_strips_both_enumerator_styles() {
        let text = "1) Describe a project where you used Rust.\n  2.   Explain how you handled ownership bugs.  ";
        let items = extract_numbered_list(text);
        assert_eq!(
            items,
            vec![
                "Describe a project where you used Rust.".to_string(),
                "Explain how you handled ownership bugs.".to_string(),
            ]
        );
    }

    #[test]
    fn test_list_truncates_to_five() {
        let text = (1..=8)
            .map(|i| format!("{i}. Question number {i} about your resume"))
            .collect::<Vec<_>>()
            .join("\n");
        let items = extract_numbered_list(&text);
        assert_eq!(items.len(), MAX_LIST_ITEMS);
        assert!(items[0].starts_with("Question number 1 "));
        assert!(items[4].starts_with("Question number 5 "));
    }

    #[test]
    fn test_list_line_of_exactly_ten_chars_is_dropped() {
        let items = extract_numbered_list("1. abcdefghij\n2. abcdefghijk");
        assert_eq!(items, vec!["abcdefghijk".to_string()]);
    }

    #[test]
    fn test_list_keeps_unnumbered_long_lines() {
        let items = extract_numbered_list("Tell me about a time you led a migration.");
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_digits_without_separator_are_kept() {
        assert_eq!(strip_enumerator("2024 was a busy year"), "2024 was a busy year");
    }
}
