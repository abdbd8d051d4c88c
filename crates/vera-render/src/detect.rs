// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! JSON-literal detection: decide whether an answer segment should be shown
//! as a structured data tree instead of prose.
//!
//! This is a classification step, not a validating parser — any parse failure
//! simply means "not JSON".  The bracket pre-check keeps the common prose
//! path cheap by skipping the full parse for everything that cannot possibly
//! be a literal.

use serde_json::Value;

/// Returns `true` when the trimmed text is bracketed like a JSON object or
/// array **and** parses as well-formed JSON.
pub fn looks_like_json(text: &str) -> bool {
    parse_json_literal(text).is_some()
}

/// Parse the text as a JSON literal when it passes the bracket pre-check.
///
/// The view layer uses the returned [`Value`] for the structured display so
/// the trial parse is not repeated.
pub fn parse_json_literal(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    let bracketed = (trimmed.starts_with('{') && trimmed.ends_with('}'))
        || (trimmed.starts_with('[') && trimmed.ends_with(']'));
    if !bracketed {
        return None;
    }
    serde_json::from_str(trimmed).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_object_is_detected() {
        assert!(looks_like_json(r#"{"a":1}"#));
    }

    #[test]
    fn well_formed_array_is_detected() {
        assert!(looks_like_json(r#"[1, 2, {"x": null}]"#));
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert!(looks_like_json("  \n {\"a\": true} \n "));
    }

    #[test]
    fn malformed_object_is_rejected() {
        assert!(!looks_like_json("{a:1"));
        assert!(!looks_like_json("{'single': 'quotes'}"));
    }

    #[test]
    fn prose_is_rejected_without_parsing() {
        assert!(!looks_like_json("hello"));
        assert!(!looks_like_json(""));
    }

    #[test]
    fn bare_scalars_are_not_literals() {
        // Valid JSON, but not bracketed — rendered as prose.
        assert!(!looks_like_json("42"));
        assert!(!looks_like_json("\"quoted\""));
    }

    #[test]
    fn bracketed_prose_is_rejected_by_the_parse() {
        assert!(!looks_like_json("{not actually json}"));
    }

    #[test]
    fn parse_returns_the_value_for_the_view() {
        let v = parse_json_literal(r#"{"answer": [1, 2]}"#).unwrap();
        assert_eq!(v["answer"][1], 2);
    }
}
