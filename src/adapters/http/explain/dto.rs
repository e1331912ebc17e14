//! HTTP DTOs for the explain endpoint.
//!
//! Request parsing is lenient: absent, mistyped or unknown values fall back to
//! defaults so that a child never sees an error page.

use serde::Serialize;
use serde_json::Value;

use crate::application::{GenerateExplanationCommand, GeneratedExplanation};
use crate::domain::curriculum::{Stage, StageContext, TeachingMethod};
use crate::domain::learner::{Gender, GradeBand, LearnerProfile, DEFAULT_INTERESTS};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to explain a topic at a stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExplainRequest {
    pub name: Option<String>,
    pub gender: Option<String>,
    pub grade: Option<String>,
    pub interests: Option<String>,
    pub topic: Option<String>,
    pub stage: Option<i64>,
    pub attempt_number: Option<i64>,
}

impl ExplainRequest {
    /// Reads a request body; anything that is not a JSON object yields defaults.
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice::<Value>(body)
            .map(|value| Self::from_value(&value))
            .unwrap_or_default()
    }

    pub fn from_value(value: &Value) -> Self {
        Self {
            name: text_field(value, "name"),
            gender: text_field(value, "gender"),
            grade: text_field(value, "grade"),
            interests: text_field(value, "interests"),
            topic: text_field(value, "topic"),
            stage: integer_field(value, "stage"),
            attempt_number: integer_field(value, "attemptNumber"),
        }
    }

    pub fn profile(&self) -> LearnerProfile {
        let gender = self
            .gender
            .as_deref()
            .and_then(|g| g.parse::<Gender>().ok())
            .unwrap_or_default();
        let grade = self
            .grade
            .as_deref()
            .and_then(|g| g.parse::<GradeBand>().ok())
            .unwrap_or_default();
        let interests = match self.interests.as_deref() {
            Some(i) if !i.trim().is_empty() => i.to_string(),
            _ => DEFAULT_INTERESTS.to_string(),
        };

        LearnerProfile::new(self.name.clone().unwrap_or_default(), gender, grade, interests)
    }

    pub fn stage_context(&self) -> StageContext {
        StageContext::new(
            Stage::clamped(self.stage.unwrap_or(1)),
            self.attempt_number.unwrap_or(1),
        )
    }

    pub fn into_command(self, client_id: impl Into<String>) -> GenerateExplanationCommand {
        let profile = self.profile();
        let context = self.stage_context();
        GenerateExplanationCommand::new(profile, self.topic.unwrap_or_default(), context)
            .with_client_id(client_id)
    }
}

fn text_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn integer_field(value: &Value, key: &str) -> Option<i64> {
    match value.get(key)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// The explanation contract consumed by the UI.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExplainResponse {
    pub content: String,
    pub visual: String,
    pub is_question: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_button_text: Option<String>,
    pub method: TeachingMethod,
    pub topic_match: bool,
}

impl From<GeneratedExplanation> for ExplainResponse {
    fn from(generated: GeneratedExplanation) -> Self {
        let result = generated.result;
        Self {
            is_question: result.is_question(),
            hint: result.hint().map(str::to_string),
            correct_answer: result.correct_answer().map(str::to_string),
            next_button_text: result.next_button_text().map(str::to_string),
            content: result.content,
            visual: result.visual,
            method: generated.method,
            topic_match: generated.topic_match,
        }
    }
}

/// Error body for the few non-success responses.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }

    pub fn method_not_allowed() -> Self {
        Self::new("Method not allowed")
    }
}

/// Liveness probe body.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ContentSource;
    use crate::domain::explanation::ExplanationResult;
    use crate::domain::learner::DEFAULT_LEARNER_NAME;
    use serde_json::json;

    #[test]
    fn garbage_body_yields_defaults() {
        let request = ExplainRequest::from_body(b"not json{");
        assert_eq!(request, ExplainRequest::default());

        let profile = request.profile();
        assert_eq!(profile.name, DEFAULT_LEARNER_NAME);
        assert_eq!(profile.gender, Gender::Boy);
        assert_eq!(profile.grade, GradeBand::FirstSecond);
        assert_eq!(profile.interests, DEFAULT_INTERESTS);
        assert_eq!(request.stage_context(), StageContext::new(Stage::Hook, 1));
    }

    #[test]
    fn fields_are_read_leniently() {
        let request = ExplainRequest::from_value(&json!({
            "name": "דני",
            "gender": "girl",
            "grade": "5-6",
            "interests": "כדורגל",
            "topic": "שברים",
            "stage": "4",
            "attemptNumber": 3.0
        }));
        let profile = request.profile();

        assert_eq!(profile.name, "דני");
        assert_eq!(profile.gender, Gender::Girl);
        assert_eq!(profile.grade, GradeBand::FifthSixth);
        assert_eq!(request.stage_context(), StageContext::new(Stage::EasyPractice, 3));
    }

    #[test]
    fn unknown_enums_and_out_of_range_stage_fall_back() {
        let request = ExplainRequest::from_value(&json!({
            "gender": "robot",
            "grade": "12",
            "stage": 9,
            "interests": "  "
        }));
        let profile = request.profile();

        assert_eq!(profile.gender, Gender::Boy);
        assert_eq!(profile.grade, GradeBand::FirstSecond);
        assert_eq!(profile.interests, DEFAULT_INTERESTS);
        assert_eq!(request.stage_context().stage, Stage::Challenge);
    }

    #[test]
    fn into_command_carries_client_and_topic() {
        let request = ExplainRequest::from_value(&json!({"topic": "כפל"}));
        let cmd = request.into_command("10.0.0.1");
        assert_eq!(cmd.topic, "כפל");
        assert_eq!(cmd.client_id.as_deref(), Some("10.0.0.1"));
    }

    #[test]
    fn explanation_response_omits_question_fields() {
        let response = ExplainResponse::from(GeneratedExplanation {
            result: ExplanationResult::explanation("c", "v", "next"),
            method: TeachingMethod::VisualPattern,
            topic_match: true,
            source: ContentSource::Generated,
        });
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["isQuestion"], false);
        assert_eq!(json["nextButtonText"], "next");
        assert_eq!(json["method"], "visual_pattern");
        assert_eq!(json["topicMatch"], true);
        assert!(json.get("hint").is_none());
        assert!(json.get("correctAnswer").is_none());
    }

    #[test]
    fn question_response_omits_button_text() {
        let response = ExplainResponse::from(GeneratedExplanation {
            result: ExplanationResult::question("c", "v", "h", "42"),
            method: TeachingMethod::StoryBased,
            topic_match: false,
            source: ContentSource::Generated,
        });
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["isQuestion"], true);
        assert_eq!(json["hint"], "h");
        assert_eq!(json["correctAnswer"], "42");
        assert!(json.get("nextButtonText").is_none());
    }
}
