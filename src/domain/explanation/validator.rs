//! Content gate applied to every generated result.
//!
//! The prompt only asks the model to follow the topic rule; this is where the
//! rule is enforced. All checks must pass:
//!
//! 1. no forbidden word in `content ++ visual ++ hint`
//! 2. at least one interest token in that same text (waived without interests)
//! 3. a math-markup delimiter in `content`
//! 4. every integer literal in `content` within the rule's ceiling
//!
//! `mustInclude` is deliberately not checked here; it stays prompt guidance.
//! The numeric check only scans ASCII digit runs and does not evaluate
//! expressions inside math markup.

use thiserror::Error;

use crate::domain::curriculum::TopicRule;
use crate::domain::learner::LearnerProfile;

use super::ExplanationResult;

/// Markers that show numerics were formatted as math markup.
pub const MATH_DELIMITERS: [&str; 2] = ["$", "\\frac"];

/// The first check a result failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentViolation {
    #[error("contains forbidden word '{0}'")]
    ForbiddenWord(String),

    #[error("does not mention any of the learner's interests")]
    MissingPersonalization,

    #[error("content has no math markup")]
    MissingMathMarkup,

    #[error("number {found} exceeds ceiling {max}")]
    NumberTooLarge { found: String, max: u64 },
}

/// Checks results against the active topic rule and learner.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentValidator;

impl ContentValidator {
    pub fn new() -> Self {
        Self
    }

    /// True when every check passes.
    pub fn validate(
        &self,
        result: &ExplanationResult,
        rule: &TopicRule,
        profile: &LearnerProfile,
    ) -> bool {
        self.check(result, rule, profile).is_ok()
    }

    /// Runs the checks in order and reports the first failure.
    pub fn check(
        &self,
        result: &ExplanationResult,
        rule: &TopicRule,
        profile: &LearnerProfile,
    ) -> Result<(), ContentViolation> {
        let visible = result.learner_visible_text();

        if let Some(word) = rule.first_forbidden_in(&visible) {
            return Err(ContentViolation::ForbiddenWord(word.to_string()));
        }

        if profile.has_interests() && !profile.interest_tokens().any(|t| visible.contains(t)) {
            return Err(ContentViolation::MissingPersonalization);
        }

        if !MATH_DELIMITERS.iter().any(|d| result.content.contains(d)) {
            return Err(ContentViolation::MissingMathMarkup);
        }

        if let Some(found) = first_number_over(&result.content, rule.max_number) {
            return Err(ContentViolation::NumberTooLarge {
                found: found.to_string(),
                max: rule.max_number,
            });
        }

        Ok(())
    }
}

/// Returns the first ASCII digit run whose value exceeds `max`.
///
/// Runs too long to fit a `u64` count as exceeding.
fn first_number_over(text: &str, max: u64) -> Option<&str> {
    text.split(|c: char| !c.is_ascii_digit())
        .filter(|run| !run.is_empty())
        .find(|run| run.parse::<u64>().map_or(true, |n| n > max))
}
