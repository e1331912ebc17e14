//! Bidirectional text formatting for right-to-left paragraphs.
//!
//! Runs of ASCII digits and runs of Latin letters are wrapped in a
//! left-to-right isolate so numerals and English tokens keep their natural
//! order inside Hebrew text. The transform is not idempotent: formatting
//! already formatted text nests another isolate pair around each run.

/// LEFT-TO-RIGHT ISOLATE.
pub const LRI: char = '\u{2066}';

/// POP DIRECTIONAL ISOLATE.
pub const PDI: char = '\u{2069}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunClass {
    Digits,
    Latin,
}

fn classify(c: char) -> Option<RunClass> {
    if c.is_ascii_digit() {
        Some(RunClass::Digits)
    } else if c.is_ascii_alphabetic() {
        Some(RunClass::Latin)
    } else {
        None
    }
}

/// Wraps each digit run and each Latin-letter run in `LRI … PDI`.
pub fn isolate_ltr_runs(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    let mut open: Option<RunClass> = None;

    for c in text.chars() {
        let class = classify(c);
        if open.is_some() && open != class {
            out.push(PDI);
            open = None;
        }
        if let (Some(class), None) = (class, open) {
            out.push(LRI);
            open = Some(class);
        }
        out.push(c);
    }

    if open.is_some() {
        out.push(PDI);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn isolates_number_inside_hebrew() {
        let formatted = isolate_ltr_runs("יש לי 5 תפוחים");
        assert_eq!(formatted, format!("יש לי {LRI}5{PDI} תפוחים"));
    }

    #[test]
    fn digits_and_letters_are_separate_runs() {
        let formatted = isolate_ltr_runs("x2");
        assert_eq!(formatted, format!("{LRI}x{PDI}{LRI}2{PDI}"));
    }

    #[test]
    fn multi_digit_run_is_one_isolate() {
        assert_eq!(isolate_ltr_runs("144"), format!("{LRI}144{PDI}"));
    }

    #[test]
    fn reapplying_nests_markers() {
        let once = isolate_ltr_runs("7");
        let twice = isolate_ltr_runs(&once);
        assert_eq!(twice, format!("{LRI}{LRI}7{PDI}{PDI}"));
    }

    #[test]
    fn emoji_and_punctuation_untouched() {
        assert_eq!(isolate_ltr_runs("🍕🍕 !"), "🍕🍕 !");
    }

    proptest! {
        #[test]
        fn no_op_without_digits_or_latin(s in "[א-ת ,.!?🍕⭐]{0,40}") {
            prop_assert_eq!(isolate_ltr_runs(&s), s);
        }

        #[test]
        fn removing_markers_restores_input(s in "\\PC{0,40}") {
            let stripped: String = isolate_ltr_runs(&s)
                .chars()
                .filter(|c| *c != LRI && *c != PDI)
                .collect();
            let original: String = s.chars().filter(|c| *c != LRI && *c != PDI).collect();
            prop_assert_eq!(stripped, original);
        }
    }
}
