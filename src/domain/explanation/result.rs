//! The explanation payload handed to the learner-facing display.

use super::text_direction::isolate_ltr_runs;

/// Stage-dependent part of a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultBody {
    /// Explanation stages end with a button to the next stage.
    Explanation { next_button_text: String },
    /// Question stages carry a hint and the literal expected answer.
    Question {
        hint: String,
        correct_answer: String,
    },
}

/// A complete, display-ready explanation or question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplanationResult {
    pub content: String,
    /// Emoji sequence or vector-graphic markup.
    pub visual: String,
    pub body: ResultBody,
}

impl ExplanationResult {
    pub fn explanation(
        content: impl Into<String>,
        visual: impl Into<String>,
        next_button_text: impl Into<String>,
    ) -> Self {
        Self {
            content: content.into(),
            visual: visual.into(),
            body: ResultBody::Explanation {
                next_button_text: next_button_text.into(),
            },
        }
    }

    pub fn question(
        content: impl Into<String>,
        visual: impl Into<String>,
        hint: impl Into<String>,
        correct_answer: impl Into<String>,
    ) -> Self {
        Self {
            content: content.into(),
            visual: visual.into(),
            body: ResultBody::Question {
                hint: hint.into(),
                correct_answer: correct_answer.into(),
            },
        }
    }

    pub fn is_question(&self) -> bool {
        matches!(self.body, ResultBody::Question { .. })
    }

    pub fn hint(&self) -> Option<&str> {
        match &self.body {
            ResultBody::Question { hint, .. } => Some(hint),
            ResultBody::Explanation { .. } => None,
        }
    }

    pub fn correct_answer(&self) -> Option<&str> {
        match &self.body {
            ResultBody::Question { correct_answer, .. } => Some(correct_answer),
            ResultBody::Explanation { .. } => None,
        }
    }

    pub fn next_button_text(&self) -> Option<&str> {
        match &self.body {
            ResultBody::Explanation { next_button_text } => Some(next_button_text),
            ResultBody::Question { .. } => None,
        }
    }

    /// `content ++ visual ++ hint`, the text the vocabulary checks scan.
    pub fn learner_visible_text(&self) -> String {
        let mut text = String::with_capacity(self.content.len() + self.visual.len() + 64);
        text.push_str(&self.content);
        text.push_str(&self.visual);
        if let Some(hint) = self.hint() {
            text.push_str(hint);
        }
        text
    }

    /// Applies left-to-right isolation to every displayed string.
    ///
    /// `correct_answer` is compared against what the learner types and is
    /// left untouched.
    ///
    /// Consumes the result so the transform cannot be applied twice to the
    /// same value by accident.
    pub fn into_display(self) -> Self {
        let body = match self.body {
            ResultBody::Explanation { next_button_text } => ResultBody::Explanation {
                next_button_text: isolate_ltr_runs(&next_button_text),
            },
            ResultBody::Question {
                hint,
                correct_answer,
            } => ResultBody::Question {
                hint: isolate_ltr_runs(&hint),
                correct_answer,
            },
        };

        Self {
            content: isolate_ltr_runs(&self.content),
            visual: isolate_ltr_runs(&self.visual),
            body,
        }
    }
}
