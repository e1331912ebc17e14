//! Teaching methods and question styles.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Stage;

/// Framing of an explanation, rotated across repeated renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeachingMethod {
    /// Adventure story built on the learner's interests.
    StoryBased,
    /// Visual decomposition into repeating patterns.
    VisualPattern,
    /// The formal rule as a "secret code".
    LogicalRule,
    /// A short imaginary game won by solving the exercise.
    GameChallenge,
}

impl TeachingMethod {
    pub const ROTATION: [TeachingMethod; 4] = [
        TeachingMethod::StoryBased,
        TeachingMethod::VisualPattern,
        TeachingMethod::LogicalRule,
        TeachingMethod::GameChallenge,
    ];

    /// `(attempt - 1) mod 4`, with Euclidean modulo so any counter value maps.
    pub fn for_attempt(attempt_number: i64) -> Self {
        let index = (i128::from(attempt_number) - 1).rem_euclid(4) as usize;
        Self::ROTATION[index]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TeachingMethod::StoryBased => "story_based",
            TeachingMethod::VisualPattern => "visual_pattern",
            TeachingMethod::LogicalRule => "logical_rule",
            TeachingMethod::GameChallenge => "game_challenge",
        }
    }
}

impl fmt::Display for TeachingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of check posed in a question stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationType {
    FixError,
    IdentifyOperation,
    ExplainConcept,
    FullSolution,
}

impl VerificationType {
    const PRACTICE_ROTATION: [VerificationType; 3] = [
        VerificationType::FixError,
        VerificationType::IdentifyOperation,
        VerificationType::ExplainConcept,
    ];

    /// Question style for a stage; `None` for explanation stages.
    ///
    /// The challenge always asks for a full numeric solution. Easy practice
    /// rotates over the other three styles by attempt number.
    pub fn for_stage(stage: Stage, attempt_number: i64) -> Option<Self> {
        match stage {
            Stage::EasyPractice => {
                let index = (i128::from(attempt_number) - 1).rem_euclid(3) as usize;
                Some(Self::PRACTICE_ROTATION[index])
            }
            Stage::Challenge => Some(VerificationType::FullSolution),
            _ => None,
        }
    }

    /// Whether the expected answer is a number rather than a short sentence.
    pub fn expects_numeric_answer(&self) -> bool {
        matches!(self, VerificationType::FixError | VerificationType::FullSolution)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationType::FixError => "fix_error",
            VerificationType::IdentifyOperation => "identify_operation",
            VerificationType::ExplainConcept => "explain_concept",
            VerificationType::FullSolution => "full_solution",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_starts_with_story() {
        assert_eq!(TeachingMethod::for_attempt(1), TeachingMethod::StoryBased);
        assert_eq!(TeachingMethod::for_attempt(2), TeachingMethod::VisualPattern);
        assert_eq!(TeachingMethod::for_attempt(3), TeachingMethod::LogicalRule);
        assert_eq!(TeachingMethod::for_attempt(4), TeachingMethod::GameChallenge);
    }

    #[test]
    fn rotation_wraps_around() {
        assert_eq!(TeachingMethod::for_attempt(5), TeachingMethod::StoryBased);
        assert_eq!(TeachingMethod::for_attempt(0), TeachingMethod::GameChallenge);
        assert_eq!(TeachingMethod::for_attempt(-2), TeachingMethod::VisualPattern);
        let _ = TeachingMethod::for_attempt(i64::MIN);
    }

    #[test]
    fn method_serializes_snake_case() {
        let json = serde_json::to_string(&TeachingMethod::GameChallenge).unwrap();
        assert_eq!(json, "\"game_challenge\"");
    }

    #[test]
    fn explanation_stages_have_no_verification() {
        assert_eq!(VerificationType::for_stage(Stage::Hook, 1), None);
        assert_eq!(VerificationType::for_stage(Stage::SecretRule, 7), None);
    }

    #[test]
    fn challenge_always_full_solution() {
        for attempt in 1..10 {
            assert_eq!(
                VerificationType::for_stage(Stage::Challenge, attempt),
                Some(VerificationType::FullSolution)
            );
        }
    }

    #[test]
    fn practice_rotates_three_styles() {
        let styles: Vec<_> = (1..=4)
            .filter_map(|a| VerificationType::for_stage(Stage::EasyPractice, a))
            .collect();
        assert_eq!(
            styles,
            vec![
                VerificationType::FixError,
                VerificationType::IdentifyOperation,
                VerificationType::ExplainConcept,
                VerificationType::FixError,
            ]
        );
    }
}
