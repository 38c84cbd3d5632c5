//! Response extraction: turns raw model text into structured data.
//!
//! Models often wrap JSON in markdown code fences even when told not to, so the
//! fences are stripped before parsing. Beyond parseability, callers name the
//! top-level keys they need; a reply missing any of them is a schema error.

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

const FENCE: &str = "```";

#[derive(Debug, Error)]
pub enum ExtractError {
    /// The reply is not valid JSON after fence-stripping.
    #[error("AI returned malformed JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Valid JSON, but not the shape that was asked for.
    #[error("AI response does not match the expected format: {0}")]
    Schema(String),
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
pub fn strip_fences(text: &str) -> &str {
    let mut text = text.trim();

    if let Some(rest) = text.strip_prefix(FENCE) {
        text = rest;
        let tag_len = text
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(text.len());
        if text[..tag_len].eq_ignore_ascii_case("json") {
            text = &text[tag_len..];
        }
    }

    if let Some(rest) = text.trim_end().strip_suffix(FENCE) {
        text = rest;
    }

    text.trim()
}

/// Fence-strips and parses `raw` without any shape checks.
pub fn extract_value(raw: &str) -> Result<Value, ExtractError> {
    Ok(serde_json::from_str(strip_fences(raw))?)
}

/// Fence-strips and parses `raw`, requires every key in `required` at the top
/// level, then deserializes into `T`.
pub fn extract<T: DeserializeOwned>(raw: &str, required: &[&str]) -> Result<T, ExtractError> {
    let value = extract_value(raw)?;

    let object = value
        .as_object()
        .ok_or_else(|| ExtractError::Schema("expected a JSON object".to_string()))?;
    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|key| !object.contains_key(*key))
        .collect();
    if !missing.is_empty() {
        return Err(ExtractError::Schema(format!(
            "missing required field(s): {}",
            missing.join(", ")
        )));
    }

    serde_json::from_value(value).map_err(|e| ExtractError::Schema(e.to_string()))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde::Deserialize;

    use super::*;

    const CAREERS: &str = r#"{"careers": {"Data Scientist": "Works with data"}}"#;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Careers {
        careers: BTreeMap<String, String>,
    }

    #[test]
    fn test_strip_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_fences_no_fences() {
        let input = "  {\"key\": \"value\"}\n";
        assert_eq!(strip_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_fences_uppercase_tag_on_same_line() {
        assert_eq!(strip_fences("```JSON{\"a\": 1}```"), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_fences_unterminated_fence() {
        assert_eq!(strip_fences("```json\n[1, 2]"), "[1, 2]");
    }

    #[test]
    fn test_strip_fences_keeps_json_inside_values() {
        let input = "```\n{\"format\": \"json\"}\n```";
        assert_eq!(strip_fences(input), "{\"format\": \"json\"}");
    }

    #[test]
    fn test_fenced_and_bare_replies_extract_identically() {
        let bare: Careers = extract(CAREERS, &["careers"]).unwrap();
        for wrapped in [
            format!("```json\n{CAREERS}\n```"),
            format!("```\n{CAREERS}\n```"),
            format!("\n\n```json {CAREERS}```  \n"),
        ] {
            let parsed: Careers = extract(&wrapped, &["careers"]).unwrap();
            assert_eq!(parsed, bare);
        }
        assert!(bare.careers.contains_key("Data Scientist"));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        for raw in [
            "```json\n{\"careers\": {\"Data Scientist\": \"x\",}\n```",
            "Sure! Here are some careers you might like.",
            "",
            "```json\n```",
        ] {
            let err = extract::<Careers>(raw, &["careers"]).unwrap_err();
            assert!(matches!(err, ExtractError::Parse(_)), "{raw:?} gave {err:?}");
        }
    }

    #[test]
    fn test_missing_keys_are_named_in_schema_error() {
        let err = extract::<Value>(r#"{"summary": "s"}"#, &["summary", "roadmap", "links"])
            .unwrap_err();
        match err {
            ExtractError::Schema(msg) => {
                assert!(msg.contains("roadmap"));
                assert!(msg.contains("links"));
                assert!(!msg.contains("summary"));
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_non_object_is_schema_error() {
        let err = extract::<Value>("[1, 2, 3]", &["careers"]).unwrap_err();
        assert!(matches!(err, ExtractError::Schema(_)));
    }

    #[test]
    fn test_wrong_field_type_is_schema_error() {
        let err = extract::<Careers>(r#"{"careers": ["Data Scientist"]}"#, &["careers"])
            .unwrap_err();
        assert!(matches!(err, ExtractError::Schema(_)));
    }

    #[test]
    fn test_extract_value_skips_shape_checks() {
        let value = extract_value("```json\n[1, 2]\n```").unwrap();
        assert_eq!(value, serde_json::json!([1, 2]));
    }
}
