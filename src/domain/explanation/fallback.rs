//! Static fallback content.
//!
//! Used whenever generation or validation fails, so it must never fail
//! itself: no I/O, no allocation that can error, no lookups that can miss.
//! Each entry is written to pass [`ContentValidator`](super::ContentValidator)
//! for its own topic rule: math markup in the content, numbers inside the
//! rule's ceiling, none of the rule's forbidden words. The learner's name and
//! one interest token are spliced in so the personalization check passes too;
//! a token with digits goes into `visual`, which the number check skips.

use crate::domain::curriculum::{Stage, TopicRule};
use crate::domain::learner::LearnerProfile;

use super::ExplanationResult;

/// Used in place of a learner name that would break the topic rule.
pub const GENERIC_LEARNER_TITLE: &str = "קצין";

/// Used in place of a topic string that would break the topic rule.
pub const GENERIC_TOPIC_PHRASE: &str = "הנושא הזה";

/// Used when no interest token can be spliced in safely.
const GENERIC_INTEREST: &str = "ההרפתקה";

const NEXT_BUTTON_TEXT: &str = "🚀 ממשיכים למסע!";

struct ExplanationTemplate {
    content: &'static str,
}

struct QuestionTemplate {
    content: &'static str,
    hint: &'static str,
    correct_answer: &'static str,
}

struct FallbackEntry {
    keyword: &'static str,
    explanation: ExplanationTemplate,
    question: QuestionTemplate,
}

// Placeholders: {name}, {interest}, {topic}.
const TABLE: &[FallbackEntry] = &[
    FallbackEntry {
        keyword: "שברים",
        explanation: ExplanationTemplate {
            content: "{name}, קפטן קליק שולח פיצה 🍕 לכל חובבי {interest}! חצי פיצה ($$\\frac{1}{2}$$) ועוד חצי פיצה ($$\\frac{1}{2}$$) הן שלם אחד ($$1$$)!",
        },
        question: QuestionTemplate {
            content: "משימת אימון, {name}: בזמן {interest} חתכנו פיצה. מה גדול יותר, רבע פיצה ($$\\frac{1}{4}$$) או חצי פיצה ($$\\frac{1}{2}$$)?",
            hint: "ככל שיש פחות חתיכות בפיצה, כל חתיכה גדולה יותר",
            correct_answer: "חצי",
        },
    },
    FallbackEntry {
        keyword: "כפל",
        explanation: ExplanationTemplate {
            content: "{name}, קפטן קליק מצא קופסאות של {interest}! $3$ קופסאות $\\times$ $4$ כוכבים בכל קופסה = $12$ כוכבים! $$3 \\times 4 = 12$$",
        },
        question: QuestionTemplate {
            content: "משימת אימון, {name}: בכל קבוצה של {interest} יש $5$ שחקנים. כמה שחקנים יש ב-$4$ קבוצות? $$4 \\times 5 = ?$$",
            hint: "ספרו חמש ועוד חמש, קבוצה אחרי קבוצה",
            correct_answer: "20",
        },
    },
    FallbackEntry {
        keyword: "חיבור",
        explanation: ExplanationTemplate {
            content: "{name}, בהרפתקת {interest} אספנו $3$ תפוחים ועוד $4$ תפוחים. ביחד יש לנו $$3 + 4 = 7$$ תפוחים!",
        },
        question: QuestionTemplate {
            content: "משימת אימון, {name}: בזמן {interest} מצאת $6$ כדורים ועוד $5$ כדורים. כמה כדורים יש לך ביחד? $$6 + 5 = ?$$",
            hint: "התחילו משש וספרו עוד חמישה צעדים קדימה",
            correct_answer: "11",
        },
    },
    FallbackEntry {
        keyword: "חיסור",
        explanation: ExplanationTemplate {
            content: "{name}, בהרפתקת {interest} היו לנו $8$ עוגיות והורדנו $3$. נשארו $$8 - 3 = 5$$ עוגיות!",
        },
        question: QuestionTemplate {
            content: "משימת אימון, {name}: בזמן {interest} היו לך $10$ בלונים ו-$4$ עפו. כמה בלונים נשארו? $$10 - 4 = ?$$",
            hint: "התחילו מעשר וספרו ארבעה צעדים אחורה",
            correct_answer: "6",
        },
    },
];

const GENERIC: FallbackEntry = FallbackEntry {
    keyword: "",
    explanation: ExplanationTemplate {
        content: "{name}, קפטן קליק יוצא למסע אל {topic} יחד עם {interest}! כל מסע מתחיל בצעד אחד: $$1 + 1 = 2$$",
    },
    question: QuestionTemplate {
        content: "משימת אימון על {topic}, {name}: בזמן {interest} מצאת $2$ כוכבים ועוד $2$ כוכבים. כמה כוכבים יש לך? $$2 + 2 = ?$$",
        hint: "ספרו על האצבעות",
        correct_answer: "4",
    },
};

/// Pure, infallible source of substitute content.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackProvider;

impl FallbackProvider {
    pub fn new() -> Self {
        Self
    }

    /// Returns the fallback for the resolved rule and stage.
    ///
    /// The stage picks the explanation or question bucket; a keyword without
    /// a table entry gets the generic entry.
    pub fn get(
        &self,
        rule: &TopicRule,
        topic: &str,
        stage: Stage,
        profile: &LearnerProfile,
    ) -> ExplanationResult {
        let entry = TABLE
            .iter()
            .find(|entry| !rule.keyword.is_empty() && entry.keyword == rule.keyword)
            .unwrap_or(&GENERIC);

        let personalization = Personalization::choose(rule, profile);
        let fill = Placeholders {
            name: safe_or(rule, &profile.name, GENERIC_LEARNER_TITLE),
            interest: personalization.in_content(),
            topic: safe_or(rule, topic.trim(), GENERIC_TOPIC_PHRASE),
        };
        let emojis = rule.primary_emoji().repeat(3);
        let visual = match personalization {
            Personalization::Visual(token) => format!("{token} {emojis}"),
            _ => emojis,
        };

        if stage.is_question() {
            ExplanationResult::question(
                fill.render(entry.question.content),
                visual,
                entry.question.hint,
                entry.question.correct_answer,
            )
        } else {
            ExplanationResult::explanation(
                fill.render(entry.explanation.content),
                visual,
                NEXT_BUTTON_TEXT,
            )
        }
    }

    /// Keywords that have a dedicated table entry.
    pub fn covered_keywords(&self) -> impl Iterator<Item = &'static str> {
        TABLE.iter().map(|entry| entry.keyword)
    }
}

struct Placeholders<'a> {
    name: &'a str,
    interest: &'a str,
    topic: &'a str,
}

impl Placeholders<'_> {
    fn render(&self, template: &str) -> String {
        template
            .replace("{topic}", self.topic)
            .replace("{name}", self.name)
            .replace("{interest}", self.interest)
    }
}

/// True when `text` can be shown under `rule` without tripping the validator.
fn is_safe(rule: &TopicRule, text: &str) -> bool {
    !text.is_empty()
        && !text.chars().any(|c| c.is_ascii_digit())
        && rule.first_forbidden_in(text).is_none()
}

fn safe_or<'a>(rule: &TopicRule, text: &'a str, replacement: &'a str) -> &'a str {
    if is_safe(rule, text) {
        text
    } else {
        replacement
    }
}

/// Where the learner's interest appears in fallback content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Personalization<'a> {
    /// Spliced into `content`.
    Content(&'a str),
    /// Has digits, so it stays out of the number-checked `content` and is
    /// shown next to the emojis instead.
    Visual(&'a str),
    /// Every token carries a forbidden word.
    Generic,
}

impl<'a> Personalization<'a> {
    fn choose(rule: &TopicRule, profile: &'a LearnerProfile) -> Self {
        if let Some(token) = profile.interest_tokens().find(|t| is_safe(rule, t)) {
            return Personalization::Content(token);
        }
        profile
            .interest_tokens()
            .find(|t| rule.first_forbidden_in(t).is_none())
            .map(Personalization::Visual)
            .unwrap_or(Personalization::Generic)
    }

    fn in_content(&self) -> &'a str {
        match self {
            Personalization::Content(token) => token,
            _ => GENERIC_INTEREST,
        }
    }
}
