//! Prompt composition.
//!
//! One parameterized prompt for every topic and stage. The topic rule is
//! injected as instructions (vocabulary, emoji whitelist, numeric ceiling);
//! the validator enforces it afterwards. The stage decides the pedagogical
//! goal and the JSON shape the model must return.

use serde_json::json;

use crate::domain::curriculum::{Stage, TeachingMethod, TopicRule, VerificationType};
use crate::domain::learner::LearnerProfile;

/// Name of the persona that addresses the learner.
pub const PERSONA_NAME: &str = "קפטן קליק";

/// Academic terms that are never to be used with young learners.
const ACADEMIC_TERMS: [&str; 4] = ["מונה", "מכנה", "מכפלה", "סדר פעולות חשבון"];

/// How the prompt is split into messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptShape {
    /// Persona and rules as the system prompt, the concrete task as the user turn.
    #[default]
    SystemUser,
    /// Everything in one user turn.
    SingleTurn,
}

/// A composed generation request, ready for the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSpec {
    pub method: TeachingMethod,
    pub verification: Option<VerificationType>,
    pub system: Option<String>,
    pub user: String,
}

impl PromptSpec {
    /// The whole prompt as one text, for backends without a system slot.
    pub fn as_single_turn(&self) -> String {
        match &self.system {
            Some(system) => format!("{}\n\n{}", system, self.user),
            None => self.user.clone(),
        }
    }
}

/// Builds prompts from learner, topic rule and stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptComposer {
    shape: PromptShape,
}

impl PromptComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_shape(mut self, shape: PromptShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn compose(
        &self,
        profile: &LearnerProfile,
        topic: &str,
        rule: &TopicRule,
        stage: Stage,
        attempt_number: i64,
    ) -> PromptSpec {
        let method = TeachingMethod::for_attempt(attempt_number);
        let verification = VerificationType::for_stage(stage, attempt_number);

        let system = [
            persona(profile),
            tone_rules(profile),
            topic_rules(topic, rule),
        ]
        .join("\n\n");

        let mut user = vec![
            task(profile, topic),
            method_instructions(method, topic, profile, rule),
            stage_goal(stage),
        ];
        if let Some(verification) = verification {
            user.push(verification_instructions(verification, profile));
        }
        user.push(response_contract(stage));
        let user = user.join("\n\n");

        match self.shape {
            PromptShape::SystemUser => PromptSpec {
                method,
                verification,
                system: Some(system),
                user,
            },
            PromptShape::SingleTurn => PromptSpec {
                method,
                verification,
                system: None,
                user: format!("{}\n\n{}", system, user),
            },
        }
    }
}

fn persona(profile: &LearnerProfile) -> String {
    format!(
        "אתה {PERSONA_NAME} 🚀, מומחה הרפתקאות המתמטיקה. הגעת מהחלל כדי לעזור לקצינים צעירים כמו {name} לפצח את הקודים הסודיים של המתמטיקה.\n\
         האישיות שלך: מלאת אנרגיה, דרמטית, מעודדת מאוד וחברית.\n\
         תחומי העניין של {name}: **{interests}**.\n\
         **חובה עליונה:** כל דוגמה וכל סיפור חייבים להיבנות על תחומי העניין האלה, ולהזכיר לפחות אחד מהם במילים המדויקות.",
        name = profile.name,
        interests = profile.interests.trim(),
    )
}

fn tone_rules(profile: &LearnerProfile) -> String {
    let level = if profile.grade.is_early() {
        "משפטים קצרים מאוד ומילים יומיומיות בלבד"
    } else {
        "משפטים קצרים ומילים פשוטות"
    };
    format!(
        "**טון וסגנון:**\n\
         * שפה חושית ומיידית: לפחות 3 מילים חזקות (כמו 'בום', 'זינוק', 'כוח', 'טס', 'מסתובב').\n\
         * משפט מעודד אחד שמנרמל את הקושי (למשל: \"זה נראה מסובך, אבל יש לנו את הקוד הסודי!\").\n\
         * מתאים לכיתה {grade}: {level}.",
        grade = profile.grade,
    )
}

fn topic_rules(topic: &str, rule: &TopicRule) -> String {
    let mut rules = vec![
        format!(
            "1. **פשטות:** אסור להשתמש במושגים אקדמיים כמו {}. השתמש במילים פשוטות ('המספר למעלה', 'המספר הכולל').",
            ACADEMIC_TERMS.map(|t| format!("'{}'", t)).join(", ")
        ),
        "2. **סימון מתמטי:** כל מספר, שבר או תרגיל בתוכן עטוף בסימון LaTeX, למשל $$1+1=2$$ או $\\frac{1}{2}$.".to_string(),
    ];
    if !rule.must_include.is_empty() {
        rules.push(format!("3. חובה להשתמש במילים: {}", rule.must_include.join(", ")));
    }
    if !rule.forbidden.is_empty() {
        rules.push(format!(
            "4. אסור בהחלט להשתמש במילים (גם לא כחלק ממילה אחרת): {}",
            rule.forbidden.join(", ")
        ));
    }
    if !rule.valid_emojis.is_empty() {
        rules.push(format!("5. אמוג'ים מותרים בלבד: {}", rule.valid_emojis.join(" ")));
    }
    rules.push(format!("6. אף מספר לא יהיה גדול מ-{}.", rule.max_number));

    format!("**חוקי ברזל לנושא {} (חובה לעמוד בכולם):**\n{}", topic, rules.join("\n"))
}

fn task(profile: &LearnerProfile, topic: &str) -> String {
    format!(
        "המשימה שלך: להסביר את **{topic}** ל{title} {name} בכיתה {grade}.",
        title = profile.gender.captain_title(),
        name = profile.name,
        grade = profile.grade,
    )
}

/// Operation pairs offered as the inverse-operation contrast.
const INVERSE_PAIRS: [&str; 2] = ["חיבור מול חיסור", "כפל מול חילוק"];

fn method_instructions(
    method: TeachingMethod,
    topic: &str,
    profile: &LearnerProfile,
    rule: &TopicRule,
) -> String {
    let name = &profile.name;
    match method {
        TeachingMethod::StoryBased => format!(
            "📖 סיפור הרפתקאות: צור סיפור קצר ומותח שמשלב את {topic} ואת תחומי העניין של {name}. הדמויות מבצעות פעולות מתמטיות. הסבר קודם למה צריך את הכלל, ורק אחר כך איך הוא עובד."
        ),
        TeachingMethod::VisualPattern => "👁️ דפוס קוסמי: פרק את הרעיון לתמונה והראה דפוס שחוזר על עצמו. ה-visual משקף את הדפוס. הסבר רק ביס קטן אחד בכל פעם.".to_string(),
        TeachingMethod::LogicalRule => format!(
            "🧠 קוד סודי: חשוף את הכלל עצמו כטריק סודי, והשווה לרגע לפעולה ההפוכה{} כדי לחדד את הגבולות.",
            inverse_examples(rule)
        ),
        TeachingMethod::GameChallenge => "🎮 משימת אימון: הגדר משחק דמיוני קצר (כמו משימת חלל) שמנצחים בו רק בפתרון התרגיל. השתמש באנלוגיה פעילה כמו מכונת שכפול, פורטל או קרן לייזר.".to_string(),
    }
}

/// Contrast examples free of the rule's forbidden words, in parentheses.
fn inverse_examples(rule: &TopicRule) -> String {
    let allowed: Vec<&str> = INVERSE_PAIRS
        .iter()
        .copied()
        .filter(|pair| rule.first_forbidden_in(pair).is_none())
        .collect();
    if allowed.is_empty() {
        String::new()
    } else {
        format!(" ({})", allowed.join(", "))
    }
}

fn stage_goal(stage: Stage) -> String {
    let goal = match stage {
        Stage::Hook => "עורר את הצורך: הראה למה הרעיון חשוב בסיפור, בלי לחשוף עדיין איך מחשבים.",
        Stage::Concept => "הדגם רק באמצעות ה-visual והדפוס החוזר. בלי כללים ובלי נוסחאות.",
        Stage::SecretRule => "חשוף את הטריק הסודי (הכלל) והשווה אותו לפעולה ההפוכה.",
        Stage::EasyPractice => "שאל שאלת תרגול קלה אחת.",
        Stage::Challenge => "שאל שאלת אתגר אחרונה אחת.",
    };
    format!("**דרישות לשלב {} מתוך 5:** {}", stage.number(), goal)
}

fn verification_instructions(verification: VerificationType, profile: &LearnerProfile) -> String {
    let answer = if verification.expects_numeric_answer() {
        "תרגיל שדורש פתרון מספרי. `correctAnswer` הוא מספר בלבד."
    } else if profile.grade.is_early() {
        "בעיה מילולית. `correctAnswer` הוא מילה אחת או צירוף קצר מאוד."
    } else {
        "בעיה מילולית. `correctAnswer` הוא מספר או צירוף קצר (עד משפט אחד)."
    };
    format!(
        "**משימת אימות הבנה:** עכשיו בודקים אם {name} מוכן/ה.\n\
         סוג הבדיקה: {kind}. ספק {answer}\n\
         ה-`hint` הוא רמז קצר ומעודד שלא מגלה את התשובה.",
        name = profile.name,
        kind = verification.as_str(),
    )
}

fn response_contract(stage: Stage) -> String {
    let template = if stage.is_question() {
        json!({
            "content": "השאלה, עם סימון LaTeX ותחומי העניין.",
            "visual": "אמוג'ים מהרשימה המותרת שמציגים את הדפוס.",
            "hint": "רמז קצר ומעודד.",
            "correctAnswer": "התשובה המדויקת.",
        })
    } else {
        json!({
            "content": "ההסבר, עם סימון LaTeX ותחומי העניין.",
            "visual": "אמוג'ים מהרשימה המותרת שמציגים את הדפוס.",
            "nextButtonText": "טקסט קצר ומלהיב לכפתור המעבר לשלב הבא.",
        })
    };
    let template = serde_json::to_string_pretty(&template).unwrap_or_else(|_| template.to_string());

    format!(
        "החזר אובייקט JSON יחיד בלבד, בדיוק במבנה הבא. בלי טקסט לפניו או אחריו ובלי עטיפת קוד (כמו ```json).\n{}",
        template
    )
}
