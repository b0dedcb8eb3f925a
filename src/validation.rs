// src/validation.rs
// Strict parsing and validation of raw model output

use crate::error::ValidationError;
use crate::labels::{Category, Sentiment};
use crate::types::{AnalysisResult, ValidationOutcome};
use serde::de::{Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;

/// Default upper bound on reply length, in characters
pub const DEFAULT_MAX_REPLY_CHARS: usize = 300;

/// Tunable bounds for validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationRules {
    pub max_reply_chars: usize,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            max_reply_chars: DEFAULT_MAX_REPLY_CHARS,
        }
    }
}

impl ValidationRules {
    pub fn with_max_reply_chars(max_reply_chars: usize) -> Self {
        Self { max_reply_chars }
    }
}

/// Expected output shape. Every field is optional at decode time so that a
/// missing field is reported by name instead of as a decoder error.
#[derive(Debug, Deserialize)]
struct RawAnalysis {
    #[serde(default)]
    category: Option<Value>,
    #[serde(default)]
    sentiment: Option<Value>,
    #[serde(default)]
    reply: Option<Value>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// Top-level keys that occur more than once in an object.
///
/// `serde_json::Value` keeps only the last occurrence of a key, so the raw
/// text is walked a second time to find them.
struct RepeatedKeys(Vec<String>);

impl<'de> Deserialize<'de> for RepeatedKeys {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct KeysVisitor;

        impl<'de> Visitor<'de> for KeysVisitor {
            type Value = RepeatedKeys;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<RepeatedKeys, A::Error> {
                let mut seen = HashSet::new();
                let mut repeated = Vec::new();
                while let Some((key, _)) = map.next_entry::<String, IgnoredAny>()? {
                    if !seen.insert(key.clone()) {
                        repeated.push(key);
                    }
                }
                Ok(RepeatedKeys(repeated))
            }
        }

        deserializer.deserialize_map(KeysVisitor)
    }
}

/// Validate raw model text against the output contract.
///
/// Checks run in a fixed order and the first failure is returned:
/// parse, missing fields, unexpected or repeated fields, category, sentiment, reply.
pub fn validate(raw: &str, rules: &ValidationRules) -> ValidationOutcome {
    match check(raw, rules) {
        Ok(result) => ValidationOutcome::Valid(result),
        Err(reason) => ValidationOutcome::Invalid(reason),
    }
}

fn check(raw: &str, rules: &ValidationRules) -> Result<AnalysisResult, ValidationError> {
    let body = strip_artifacts(raw);

    let value: Value = serde_json::from_str(body)
        .map_err(|e| ValidationError::MalformedOutput(format!("not valid JSON: {}", e)))?;
    if !value.is_object() {
        return Err(ValidationError::MalformedOutput(format!(
            "expected a JSON object, got {}",
            json_type_name(&value)
        )));
    }
    let RepeatedKeys(repeated) = serde_json::from_str(body)
        .map_err(|e| ValidationError::MalformedOutput(e.to_string()))?;
    let parsed: RawAnalysis = serde_json::from_value(value)
        .map_err(|e| ValidationError::MalformedOutput(e.to_string()))?;

    let category = parsed.category.ok_or(ValidationError::MissingField("category"))?;
    let sentiment = parsed.sentiment.ok_or(ValidationError::MissingField("sentiment"))?;
    let reply = parsed.reply.ok_or(ValidationError::MissingField("reply"))?;

    if let Some(field) = parsed.extra.keys().chain(&repeated).min() {
        return Err(ValidationError::UnexpectedField(field.clone()));
    }

    let category = match &category {
        Value::String(s) => Category::parse_exact(s),
        _ => None,
    }
    .ok_or_else(|| ValidationError::InvalidCategory(render_label(&category)))?;

    let sentiment = match &sentiment {
        Value::String(s) => Sentiment::parse_exact(s),
        _ => None,
    }
    .ok_or_else(|| ValidationError::InvalidSentiment(render_label(&sentiment)))?;

    let reply = match reply {
        Value::String(s) if !s.trim().is_empty() => s,
        _ => return Err(ValidationError::EmptyReply),
    };
    let len = reply.chars().count();
    if len > rules.max_reply_chars {
        return Err(ValidationError::ReplyTooLong {
            len,
            max: rules.max_reply_chars,
        });
    }

    Ok(AnalysisResult {
        category,
        sentiment,
        reply,
    })
}

/// Remove surrounding whitespace and a single enclosing markdown fence.
/// Anything else (leading prose, trailing text) is left for the parser to reject.
fn strip_artifacts(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(inner) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. "json") on the opening fence line
    match inner.split_once('\n') {
        Some((info, body)) if !info.trim().contains(['{', '[']) => body.trim(),
        _ => trimmed,
    }
}

fn render_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> ValidationRules {
        ValidationRules::default()
    }

    fn invalid(raw: &str) -> ValidationError {
        match validate(raw, &rules()) {
            ValidationOutcome::Invalid(reason) => reason,
            ValidationOutcome::Valid(r) => panic!("expected failure, got {:?}", r),
        }
    }

    // ============================================================================
    // Happy path
    // ============================================================================

    #[test]
    fn test_valid_output() {
        let raw = r#"{"category":"Delivery Question","sentiment":"Negative","reply":"We're sorry for the delay..."}"#;
        let outcome = validate(raw, &rules());
        assert_eq!(
            outcome,
            ValidationOutcome::Valid(AnalysisResult::new(
                Category::DeliveryQuestion,
                Sentiment::Negative,
                "We're sorry for the delay...",
            ))
        );
    }

    #[test]
    fn test_reply_is_returned_verbatim() {
        let raw = r#"{"category":"Spam","sentiment":"Neutral","reply":"  Thanks!  "}"#;
        let result = validate(raw, &rules()).into_result().unwrap();
        assert_eq!(result.reply, "  Thanks!  ");
    }

    #[test]
    fn test_surrounding_whitespace_tolerated() {
        let raw = "\n\n  {\"category\":\"Complaint\",\"sentiment\":\"Negative\",\"reply\":\"Sorry.\"}  \n";
        assert!(validate(raw, &rules()).is_valid());
    }

    #[test]
    fn test_enclosing_fence_tolerated() {
        let raw = "```json\n{\"category\":\"Complaint\",\"sentiment\":\"Negative\",\"reply\":\"Sorry.\"}\n```";
        assert!(validate(raw, &rules()).is_valid());

        let raw = "```\n{\"category\":\"Spam\",\"sentiment\":\"Neutral\",\"reply\":\"Ok.\"}\n```";
        assert!(validate(raw, &rules()).is_valid());
    }

    // ============================================================================
    // Malformed output
    // ============================================================================

    #[test]
    fn test_prose_is_malformed() {
        let err = invalid("Sure! This looks like a delivery question.");
        assert!(matches!(err, ValidationError::MalformedOutput(_)));
    }

    #[test]
    fn test_no_heuristic_extraction() {
        let raw = r#"Here you go: {"category":"Spam","sentiment":"Neutral","reply":"Ok."}"#;
        assert!(matches!(invalid(raw), ValidationError::MalformedOutput(_)));
    }

    #[test]
    fn test_truncated_json_is_malformed() {
        let raw = r#"{"category":"Spam","sentiment":"Neutral","reply":"Ok."#;
        assert!(matches!(invalid(raw), ValidationError::MalformedOutput(_)));
    }

    #[test]
    fn test_non_object_is_malformed() {
        let err = invalid(r#"["Spam","Neutral","Ok."]"#);
        assert!(err.to_string().contains("an array"));
        assert!(matches!(invalid("\"Spam\""), ValidationError::MalformedOutput(_)));
        assert!(matches!(invalid(""), ValidationError::MalformedOutput(_)));
    }

    // ============================================================================
    // Field presence
    // ============================================================================

    #[test]
    fn test_missing_field_named() {
        let err = invalid(r#"{"category":"Spam","reply":"Ok."}"#);
        assert_eq!(err, ValidationError::MissingField("sentiment"));

        let err = invalid(r#"{"category":"Spam","sentiment":"Neutral"}"#);
        assert_eq!(err, ValidationError::MissingField("reply"));
    }

    #[test]
    fn test_null_counts_as_missing() {
        let err = invalid(r#"{"category":null,"sentiment":"Neutral","reply":"Ok."}"#);
        assert_eq!(err, ValidationError::MissingField("category"));
    }

    #[test]
    fn test_unexpected_field() {
        let raw = r#"{"category":"Spam","sentiment":"Neutral","reply":"Ok.","confidence":0.9}"#;
        assert_eq!(
            invalid(raw),
            ValidationError::UnexpectedField("confidence".to_string())
        );
    }

    #[test]
    fn test_unexpected_fields_reported_in_sorted_order() {
        let raw = r#"{"zeta":1,"category":"Spam","alpha":2,"sentiment":"Neutral","reply":"Ok."}"#;
        assert_eq!(invalid(raw), ValidationError::UnexpectedField("alpha".to_string()));
    }

    #[test]
    fn test_repeated_field_rejected() {
        let raw = r#"{"category":"Urgent","sentiment":"Neutral","reply":"Ok.","category":"Spam"}"#;
        assert_eq!(invalid(raw), ValidationError::UnexpectedField("category".to_string()));

        let raw = r#"{"category":"Spam","sentiment":"Neutral","reply":"Ok.","reply":"Ok."}"#;
        assert_eq!(invalid(raw), ValidationError::UnexpectedField("reply".to_string()));
    }

    #[test]
    fn test_repeated_field_matches_escaped_spelling() {
        let raw = r#"{"category":"Spam","sentiment":"Neutral","reply":"Ok.","c\u0061tegory":"Spam"}"#;
        assert_eq!(invalid(raw), ValidationError::UnexpectedField("category".to_string()));
    }

    #[test]
    fn test_missing_beats_repeated() {
        let raw = r#"{"category":"Spam","category":"Spam","sentiment":"Neutral"}"#;
        assert_eq!(invalid(raw), ValidationError::MissingField("reply"));
    }

    // ============================================================================
    // Labels
    // ============================================================================

    #[test]
    fn test_invalid_category_named() {
        let raw = r#"{"category":"Urgent","sentiment":"Negative","reply":"Ok."}"#;
        assert_eq!(invalid(raw), ValidationError::InvalidCategory("Urgent".to_string()));
    }

    #[test]
    fn test_category_case_sensitive() {
        let raw = r#"{"category":"general query","sentiment":"Neutral","reply":"Ok."}"#;
        assert!(matches!(invalid(raw), ValidationError::InvalidCategory(_)));
    }

    #[test]
    fn test_non_string_category() {
        let raw = r#"{"category":3,"sentiment":"Neutral","reply":"Ok."}"#;
        assert_eq!(invalid(raw), ValidationError::InvalidCategory("3".to_string()));
    }

    #[test]
    fn test_invalid_sentiment() {
        let raw = r#"{"category":"Delivery Question","sentiment":"Furious","reply":"..."}"#;
        assert_eq!(invalid(raw), ValidationError::InvalidSentiment("Furious".to_string()));
    }

    // ============================================================================
    // Reply
    // ============================================================================

    #[test]
    fn test_empty_reply() {
        let raw = r#"{"category":"Spam","sentiment":"Neutral","reply":"   "}"#;
        assert_eq!(invalid(raw), ValidationError::EmptyReply);
    }

    #[test]
    fn test_non_string_reply() {
        let raw = r#"{"category":"Spam","sentiment":"Neutral","reply":["Ok."]}"#;
        assert_eq!(invalid(raw), ValidationError::EmptyReply);
    }

    #[test]
    fn test_reply_length_bound() {
        let at_limit = "a".repeat(300);
        let raw = serde_json::json!({"category":"Spam","sentiment":"Neutral","reply": at_limit}).to_string();
        assert!(validate(&raw, &rules()).is_valid());

        let over = "a".repeat(301);
        let raw = serde_json::json!({"category":"Spam","sentiment":"Neutral","reply": over}).to_string();
        assert_eq!(invalid(&raw), ValidationError::ReplyTooLong { len: 301, max: 300 });
    }

    #[test]
    fn test_reply_length_counts_chars_not_bytes() {
        let reply = "é".repeat(300);
        let raw = serde_json::json!({"category":"Spam","sentiment":"Neutral","reply": reply}).to_string();
        assert!(validate(&raw, &rules()).is_valid());
    }

    #[test]
    fn test_custom_reply_bound() {
        let raw = r#"{"category":"Spam","sentiment":"Neutral","reply":"Thanks for writing in."}"#;
        let outcome = validate(raw, &ValidationRules::with_max_reply_chars(10));
        assert_eq!(
            outcome,
            ValidationOutcome::Invalid(ValidationError::ReplyTooLong { len: 22, max: 10 })
        );
    }

    // ============================================================================
    // First-fail-wins ordering
    // ============================================================================

    #[test]
    fn test_missing_beats_unexpected() {
        let raw = r#"{"extra":true,"category":"Spam","sentiment":"Neutral"}"#;
        assert_eq!(invalid(raw), ValidationError::MissingField("reply"));
    }

    #[test]
    fn test_unexpected_beats_bad_labels() {
        let raw = r#"{"category":"Urgent","sentiment":"Furious","reply":"","note":"x"}"#;
        assert_eq!(invalid(raw), ValidationError::UnexpectedField("note".to_string()));
    }

    #[test]
    fn test_category_beats_sentiment_beats_reply() {
        let raw = r#"{"category":"Urgent","sentiment":"Furious","reply":""}"#;
        assert!(matches!(invalid(raw), ValidationError::InvalidCategory(_)));

        let raw = r#"{"category":"Spam","sentiment":"Furious","reply":""}"#;
        assert!(matches!(invalid(raw), ValidationError::InvalidSentiment(_)));
    }

    // ============================================================================
    // strip_artifacts
    // ============================================================================

    #[test]
    fn test_strip_artifacts() {
        assert_eq!(strip_artifacts("  {}  "), "{}");
        assert_eq!(strip_artifacts("```json\n{}\n```"), "{}");
        assert_eq!(strip_artifacts("```{}```"), "```{}```");
        assert_eq!(strip_artifacts("```json\n{}"), "```json\n{}");
    }
}
