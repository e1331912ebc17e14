//! Extraction of the explanation JSON from raw model output.
//!
//! Models wrap their JSON in prose or code fences often enough that the
//! parser takes the span from the first `{` to the last `}` and ignores the
//! rest. The required fields depend on the stage: questions need a hint and
//! an answer, explanations need the next-button text.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::curriculum::Stage;

use super::ExplanationResult;

/// Maximum raw output accepted (64KB); the token budget keeps real output far smaller.
pub const MAX_RESPONSE_LENGTH: usize = 64 * 1024;

/// Errors that can occur while parsing model output.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("no JSON object found in model output")]
    NoJsonFound,

    #[error("malformed model output: {0}")]
    Malformed(String),
}

impl ParseError {
    fn missing(field: &str) -> Self {
        ParseError::Malformed(format!("missing required field '{}'", field))
    }
}

/// Parses raw model text into a stage-shaped [`ExplanationResult`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseParser;

impl ResponseParser {
    pub fn new() -> Self {
        Self
    }

    /// Parses `raw` for the given stage.
    ///
    /// Any `isQuestion` flag the model emitted is ignored; the stage decides.
    pub fn parse(&self, raw: &str, stage: Stage) -> Result<ExplanationResult, ParseError> {
        if raw.len() > MAX_RESPONSE_LENGTH {
            return Err(ParseError::Malformed(format!(
                "output of {} bytes exceeds {} bytes",
                raw.len(),
                MAX_RESPONSE_LENGTH
            )));
        }

        let span = Self::json_span(raw).ok_or(ParseError::NoJsonFound)?;
        let value: Value =
            serde_json::from_str(span).map_err(|e| ParseError::Malformed(e.to_string()))?;
        let object = value
            .as_object()
            .ok_or_else(|| ParseError::Malformed("top-level value is not an object".to_string()))?;

        let content = required_text(object, "content")?;
        let visual = optional_text(object, "visual").unwrap_or_default();

        if stage.is_question() {
            let hint = required_text(object, "hint")?;
            let correct_answer = required_text(object, "correctAnswer")?;
            Ok(ExplanationResult::question(content, visual, hint, correct_answer))
        } else {
            let next_button_text = required_text(object, "nextButtonText")?;
            Ok(ExplanationResult::explanation(content, visual, next_button_text))
        }
    }

    /// Slice from the first `{` to the last `}` inclusive.
    fn json_span(raw: &str) -> Option<&str> {
        let start = raw.find('{')?;
        let end = raw.rfind('}')?;
        (start < end).then(|| &raw[start..=end])
    }
}

/// Reads a field as literal text. Numbers count, so `"correctAnswer": 12` reads as "12".
fn optional_text(object: &Map<String, Value>, field: &str) -> Option<String> {
    match object.get(field)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn required_text(object: &Map<String, Value>, field: &str) -> Result<String, ParseError> {
    optional_text(object, field).ok_or_else(|| ParseError::missing(field))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> ResponseParser {
        ResponseParser::new()
    }

    #[test]
    fn parses_plain_explanation() {
        let raw = r#"{"content":"שלוש קבוצות $3$","visual":"⭐⭐⭐","nextButtonText":"ממשיכים!"}"#;
        let result = parser().parse(raw, Stage::Hook).unwrap();
        assert_eq!(result.content, "שלוש קבוצות $3$");
        assert_eq!(result.visual, "⭐⭐⭐");
        assert_eq!(result.next_button_text(), Some("ממשיכים!"));
    }

    #[test]
    fn tolerates_code_fence_and_prose() {
        let raw = "הנה התשובה:\n```json\n{\"content\":\"$2$\",\"nextButtonText\":\"הבא\"}\n```\nבהצלחה!";
        let result = parser().parse(raw, Stage::Concept).unwrap();
        assert_eq!(result.content, "$2$");
        assert_eq!(result.visual, "");
    }

    #[test]
    fn question_stage_reads_hint_and_numeric_answer() {
        let raw = r#"{"content":"כמה זה $4 \\times 5$?","hint":"ספרו בקבוצות","correctAnswer":20,"isQuestion":false}"#;
        let result = parser().parse(raw, Stage::Challenge).unwrap();
        assert!(result.is_question());
        assert_eq!(result.correct_answer(), Some("20"));
        assert_eq!(result.hint(), Some("ספרו בקבוצות"));
    }

    #[test]
    fn model_is_question_flag_is_ignored() {
        let raw = r#"{"content":"$1$","isQuestion":true,"nextButtonText":"הבא"}"#;
        let result = parser().parse(raw, Stage::SecretRule).unwrap();
        assert!(!result.is_question());
    }

    #[test]
    fn no_braces_is_no_json_found() {
        assert_eq!(parser().parse("sorry, I can't", Stage::Hook), Err(ParseError::NoJsonFound));
        assert_eq!(parser().parse("} backwards {", Stage::Hook), Err(ParseError::NoJsonFound));
    }

    #[test]
    fn invalid_json_is_malformed() {
        let result = parser().parse("{content: nope}", Stage::Hook);
        assert!(matches!(result, Err(ParseError::Malformed(_))));
    }

    #[test]
    fn explanation_without_button_text_is_malformed() {
        let raw = r#"{"content":"$1$","visual":"⭐"}"#;
        let err = parser().parse(raw, Stage::Hook).unwrap_err();
        assert_eq!(err, ParseError::Malformed("missing required field 'nextButtonText'".into()));
    }

    #[test]
    fn question_without_answer_is_malformed() {
        let raw = r#"{"content":"$1$","hint":"רמז","nextButtonText":"הבא"}"#;
        let err = parser().parse(raw, Stage::EasyPractice).unwrap_err();
        assert_eq!(err, ParseError::Malformed("missing required field 'correctAnswer'".into()));
    }

    #[test]
    fn blank_required_field_counts_as_missing() {
        let raw = r#"{"content":"   ","nextButtonText":"הבא"}"#;
        assert!(matches!(parser().parse(raw, Stage::Hook), Err(ParseError::Malformed(_))));
    }

    #[test]
    fn oversized_output_is_malformed() {
        let raw = format!("{{\"content\":\"{}\"}}", "א".repeat(MAX_RESPONSE_LENGTH));
        assert!(matches!(parser().parse(&raw, Stage::Hook), Err(ParseError::Malformed(_))));
    }
}
