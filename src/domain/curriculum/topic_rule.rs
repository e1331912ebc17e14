//! Topic rules and the registry that resolves them.
//!
//! Matching is a plain substring test against the raw topic string, evaluated
//! in declaration order; the first matching keyword wins. That keeps
//! precedence explicit: "שברים - חיסור" resolves to the fractions rule even
//! though it also mentions subtraction.

use once_cell::sync::Lazy;
use serde::Serialize;

/// Numeric ceiling of the permissive default rule.
pub const DEFAULT_MAX_NUMBER: u64 = 100;

/// Declarative constraint set bound to a topic keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicRule {
    /// Substring that selects this rule. Empty for the default rule.
    pub keyword: String,
    /// Vocabulary the generator is asked to use. Prompt guidance only.
    pub must_include: Vec<String>,
    /// Vocabulary that must never reach the learner.
    pub forbidden: Vec<String>,
    /// Emoji whitelist for the visual.
    pub valid_emojis: Vec<String>,
    /// Largest integer literal allowed in the content.
    pub max_number: u64,
}

impl TopicRule {
    pub fn new(keyword: impl Into<String>, max_number: u64) -> Self {
        Self {
            keyword: keyword.into(),
            must_include: Vec::new(),
            forbidden: Vec::new(),
            valid_emojis: Vec::new(),
            max_number,
        }
    }

    pub fn with_must_include(mut self, words: &[&str]) -> Self {
        self.must_include = words.iter().map(|w| w.to_string()).collect();
        self
    }

    pub fn with_forbidden(mut self, words: &[&str]) -> Self {
        self.forbidden = words.iter().map(|w| w.to_string()).collect();
        self
    }

    pub fn with_emojis(mut self, emojis: &[&str]) -> Self {
        self.valid_emojis = emojis.iter().map(|e| e.to_string()).collect();
        self
    }

    /// The permissive rule used when no keyword matches.
    pub fn permissive_default() -> Self {
        Self::new("", DEFAULT_MAX_NUMBER).with_emojis(&["📚", "✨", "🚀"])
    }

    /// Returns true if `topic` contains this rule's keyword.
    pub fn matches(&self, topic: &str) -> bool {
        !self.keyword.is_empty() && topic.contains(self.keyword.as_str())
    }

    /// Returns the first forbidden word found in `text`, if any.
    pub fn first_forbidden_in<'a>(&'a self, text: &str) -> Option<&'a str> {
        self.forbidden
            .iter()
            .map(String::as_str)
            .find(|word| !word.is_empty() && text.contains(word))
    }

    /// Emoji used for fallback visuals.
    pub fn primary_emoji(&self) -> &str {
        self.valid_emojis.first().map(String::as_str).unwrap_or("📚")
    }
}

/// Outcome of resolving a topic string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution<'a> {
    pub rule: &'a TopicRule,
    /// False when the permissive default was used.
    pub matched: bool,
}

/// Ordered, read-only list of topic rules.
#[derive(Debug, Clone)]
pub struct TopicRuleRegistry {
    rules: Vec<TopicRule>,
    default_rule: TopicRule,
}

static BUILTIN: Lazy<TopicRuleRegistry> = Lazy::new(|| {
    TopicRuleRegistry::new(vec![
        TopicRule::new("שברים", 15)
            .with_must_include(&["חלק", "שלם", "לחלק", "כמה נשאר"])
            .with_forbidden(&["כפל", "חילוק", "נעלם"])
            .with_emojis(&["🍕", "🍰", "🍫", "🥧", "🍪"]),
        TopicRule::new("כפל", 144)
            .with_must_include(&["פעמים", "להכפיל", "קבוצות", "שורות", "עמודות"])
            .with_forbidden(&["חצי", "רבע", "שברים", "נשאר"])
            .with_emojis(&["⭐", "🎯", "📦", "🎈"]),
        TopicRule::new("חיבור", 100)
            .with_must_include(&["ועוד", "ביחד", "סך הכל", "יחד", "להוסיף"])
            .with_forbidden(&["כפל", "חילוק", "שארית", "לצמצם"])
            .with_emojis(&["🍎", "🍭", "🎈", "⚽"]),
        TopicRule::new("חיסור", 100)
            .with_must_include(&["פחות", "נשאר", "הורדנו", "הפחתנו"])
            .with_forbidden(&["כפל", "חילוק", "שברים", "להכפיל"])
            .with_emojis(&["🍪", "🎈", "🚗", "✏️"]),
    ])
});

impl TopicRuleRegistry {
    /// Creates a registry evaluated in the given order.
    pub fn new(rules: Vec<TopicRule>) -> Self {
        Self {
            rules,
            default_rule: TopicRule::permissive_default(),
        }
    }

    /// Replaces the rule used when nothing matches.
    pub fn with_default(mut self, default_rule: TopicRule) -> Self {
        self.default_rule = default_rule;
        self
    }

    /// The built-in elementary-math registry.
    pub fn builtin() -> &'static TopicRuleRegistry {
        &BUILTIN
    }

    /// Resolves the single rule active for `topic`.
    pub fn resolve(&self, topic: &str) -> Resolution<'_> {
        match self.rules.iter().find(|rule| rule.matches(topic)) {
            Some(rule) => Resolution {
                rule,
                matched: true,
            },
            None => Resolution {
                rule: &self.default_rule,
                matched: false,
            },
        }
    }

    pub fn rules(&self) -> &[TopicRule] {
        &self.rules
    }

    pub fn default_rule(&self) -> &TopicRule {
        &self.default_rule
    }
}
