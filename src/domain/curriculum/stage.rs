//! Five-step lesson progression.
//!
//! ```text
//! Hook(1) -> Concept(2) -> SecretRule(3) -> EasyPractice(4) -> Challenge(5) -> Complete
//! ```
//!
//! Stages 1-3 explain, stages 4-5 ask. There are no back or skip transitions.
//! The caller owns the current stage between requests; nothing here is stored.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// One of the five pedagogical steps of a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Stage {
    /// Motivate the need without revealing mechanics.
    Hook = 1,
    /// Show the visual pattern.
    Concept = 2,
    /// Reveal the rule and contrast it with the inverse operation.
    SecretRule = 3,
    /// First question.
    EasyPractice = 4,
    /// Final question.
    Challenge = 5,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::Hook,
        Stage::Concept,
        Stage::SecretRule,
        Stage::EasyPractice,
        Stage::Challenge,
    ];

    pub fn number(&self) -> u8 {
        *self as u8
    }

    /// Question-ness is derived from the stage and nothing else.
    pub fn is_question(&self) -> bool {
        self.number() >= 4
    }

    /// The following stage, or `None` after the challenge.
    pub fn next(&self) -> Option<Stage> {
        match self {
            Stage::Hook => Some(Stage::Concept),
            Stage::Concept => Some(Stage::SecretRule),
            Stage::SecretRule => Some(Stage::EasyPractice),
            Stage::EasyPractice => Some(Stage::Challenge),
            Stage::Challenge => None,
        }
    }

    /// Maps any wire number into the valid range instead of failing.
    pub fn clamped(number: i64) -> Stage {
        match number {
            i64::MIN..=1 => Stage::Hook,
            2 => Stage::Concept,
            3 => Stage::SecretRule,
            4 => Stage::EasyPractice,
            _ => Stage::Challenge,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Stage::Hook => "hook",
            Stage::Concept => "concept",
            Stage::SecretRule => "secret rule",
            Stage::EasyPractice => "easy practice",
            Stage::Challenge => "challenge",
        }
    }
}

impl TryFrom<u8> for Stage {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Stage::Hook),
            2 => Ok(Stage::Concept),
            3 => Ok(Stage::SecretRule),
            4 => Ok(Stage::EasyPractice),
            5 => Ok(Stage::Challenge),
            other => Err(ValidationError::out_of_range("stage", 1, 5, other as i64)),
        }
    }
}

impl From<Stage> for u8 {
    fn from(stage: Stage) -> Self {
        stage.number()
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.number(), self.title())
    }
}

/// Position in the progression, including the terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageProgress {
    Active(Stage),
    /// Topic finished; the caller returns to topic selection.
    Complete,
}

impl StageProgress {
    pub fn initial() -> Self {
        StageProgress::Active(Stage::Hook)
    }

    /// Moves one step forward. `Complete` stays `Complete`.
    pub fn advance(self) -> Self {
        match self {
            StageProgress::Active(stage) => stage
                .next()
                .map(StageProgress::Active)
                .unwrap_or(StageProgress::Complete),
            StageProgress::Complete => StageProgress::Complete,
        }
    }

    pub fn stage(&self) -> Option<Stage> {
        match self {
            StageProgress::Active(stage) => Some(*stage),
            StageProgress::Complete => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, StageProgress::Complete)
    }
}

/// Stage plus the render counter that drives method rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageContext {
    pub stage: Stage,
    /// Incremented once per render, independent of the stage.
    pub attempt_number: i64,
}

impl StageContext {
    pub fn new(stage: Stage, attempt_number: i64) -> Self {
        Self {
            stage,
            attempt_number,
        }
    }

    pub fn is_question(&self) -> bool {
        self.stage.is_question()
    }

    /// The context for the next render of the same stage.
    pub fn next_attempt(self) -> Self {
        Self {
            attempt_number: self.attempt_number.saturating_add(1),
            ..self
        }
    }
}
