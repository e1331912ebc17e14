//! Learner profile value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Name used when the learner did not give one ("officer").
pub const DEFAULT_LEARNER_NAME: &str = "קצין";

/// Interests used when the learner did not give any.
pub const DEFAULT_INTERESTS: &str = "משחקי מחשב וכלבים";

/// Grammatical gender used to address the learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[default]
    Boy,
    Girl,
}

impl Gender {
    /// Captain title in the matching grammatical form.
    pub fn captain_title(&self) -> &'static str {
        match self {
            Gender::Boy => "קפטן",
            Gender::Girl => "קפטנית",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Boy => "boy",
            Gender::Girl => "girl",
        }
    }
}

impl FromStr for Gender {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "boy" => Ok(Gender::Boy),
            "girl" => Ok(Gender::Girl),
            other => Err(ValidationError::invalid_format(
                "gender",
                format!("expected 'boy' or 'girl', got '{}'", other),
            )),
        }
    }
}

/// School grade band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum GradeBand {
    #[default]
    #[serde(rename = "1-2")]
    FirstSecond,
    #[serde(rename = "3-4")]
    ThirdFourth,
    #[serde(rename = "5-6")]
    FifthSixth,
}

impl GradeBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            GradeBand::FirstSecond => "1-2",
            GradeBand::ThirdFourth => "3-4",
            GradeBand::FifthSixth => "5-6",
        }
    }

    /// Returns true for the youngest band, where short phrase answers are preferred.
    pub fn is_early(&self) -> bool {
        matches!(self, GradeBand::FirstSecond)
    }
}

impl FromStr for GradeBand {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1-2" => Ok(GradeBand::FirstSecond),
            "3-4" => Ok(GradeBand::ThirdFourth),
            "5-6" => Ok(GradeBand::FifthSixth),
            other => Err(ValidationError::invalid_format(
                "grade",
                format!("expected 1-2, 3-4 or 5-6, got '{}'", other),
            )),
        }
    }
}

impl fmt::Display for GradeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The child receiving the explanation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LearnerProfile {
    pub name: String,
    pub gender: Gender,
    pub grade: GradeBand,
    /// Free text; whitespace-delimited tokens are the personalization vocabulary.
    pub interests: String,
}

impl LearnerProfile {
    /// Creates a profile, substituting the default name when `name` is blank.
    pub fn new(
        name: impl Into<String>,
        gender: Gender,
        grade: GradeBand,
        interests: impl Into<String>,
    ) -> Self {
        let name = name.into();
        let name = if name.trim().is_empty() {
            DEFAULT_LEARNER_NAME.to_string()
        } else {
            name.trim().to_string()
        };

        Self {
            name,
            gender,
            grade,
            interests: interests.into(),
        }
    }

    /// Whitespace-delimited interest tokens.
    pub fn interest_tokens(&self) -> impl Iterator<Item = &str> {
        self.interests.split_whitespace()
    }

    pub fn has_interests(&self) -> bool {
        self.interest_tokens().next().is_some()
    }
}

impl Default for LearnerProfile {
    fn default() -> Self {
        Self::new(
            DEFAULT_LEARNER_NAME,
            Gender::default(),
            GradeBand::default(),
            DEFAULT_INTERESTS,
        )
    }
}
