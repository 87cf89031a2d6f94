pub mod rules;

pub use rules::{Rule, has_word_repetition};

/// Outcome of validating one candidate.
///
/// Not an error: rejection is a normal negative control-flow result. The
/// reason names the first failing rule and is used for diagnostics only,
/// never surfaced to the end user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub accepted: bool,
    pub reason: Option<&'static str>,
}

impl Verdict {
    fn accept() -> Self {
        Self {
            accepted: true,
            reason: None,
        }
    }

    fn reject(reason: &'static str) -> Self {
        Self {
            accepted: false,
            reason: Some(reason),
        }
    }
}

fn apply(rulesets: &[&[Rule]], text: &str) -> Verdict {
    for rules in rulesets {
        for rule in *rules {
            if (rule.rejects)(text) {
                return Verdict::reject(rule.name);
            }
        }
    }
    Verdict::accept()
}

/// Validate one poem line against the common and poem-specific rule chains.
#[must_use]
pub fn check_poem_line(line: &str) -> Verdict {
    apply(&[rules::COMMON_RULES, rules::POEM_LINE_RULES], line)
}

/// Validate one prediction sentence against the common and prediction rule
/// chains.
#[must_use]
pub fn check_prediction(text: &str) -> Verdict {
    apply(&[rules::COMMON_RULES, rules::PREDICTION_RULES], text)
}

/// Select the poem lines from a raw candidate.
///
/// Splits on newlines, trims, drops lines any rule rejects, and keeps the
/// first three survivors. `None` when fewer than three lines survive; the
/// design prefers a false rejection (and another attempt) over showing a
/// borderline poem.
#[must_use]
pub fn select_poem_lines(raw: &str) -> Option<[String; 3]> {
    let mut kept: Vec<String> = Vec::new();
    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let verdict = check_poem_line(line);
        if verdict.accepted {
            kept.push(line.to_string());
            if kept.len() == 3 {
                break;
            }
        } else {
            tracing::trace!(
                reason = verdict.reason.unwrap_or("unknown"),
                "poem line rejected"
            );
        }
    }
    if kept.len() == 3 {
        let mut lines = kept.into_iter();
        Some([lines.next()?, lines.next()?, lines.next()?])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_clean_prediction() {
        let verdict = check_prediction("the garden grows quietly each new morning");
        assert!(verdict.accepted);
        assert_eq!(verdict.reason, None);
    }

    #[test]
    fn rejects_repeated_character_run() {
        let verdict = check_prediction("aaaa bbbb cccc aaaa");
        assert!(!verdict.accepted);
        assert_eq!(verdict.reason, Some("repeated_chars"));
    }

    #[test]
    fn rejects_phrase_loop() {
        let verdict = check_prediction("go go go go");
        assert!(!verdict.accepted);
        assert_eq!(verdict.reason, Some("word_repetition"));
    }

    #[test]
    fn rejects_url_leak() {
        let verdict = check_prediction("read more at https://example.com for details");
        assert!(!verdict.accepted);
        assert_eq!(verdict.reason, Some("identity_leak"));
    }

    #[test]
    fn rejects_overlong_line() {
        let long = "a ".repeat(50);
        assert!(!check_poem_line(&long).accepted);
        assert!(!check_prediction(&long.repeat(2)).accepted);
    }

    #[test]
    fn rejects_meta_text_and_banned_phrase() {
        let verdict = check_prediction("Sure, here is your prediction that you will be a legend");
        assert!(!verdict.accepted);
        // The meta-opener fires first; the banned phrase would too.
        assert_eq!(verdict.reason, Some("meta_opener"));
        assert!(rules::PREDICTION_RULES
            .iter()
            .any(|r| r.name == "banned_content"
                && (r.rejects)("a prediction that you will be a legend")));
    }

    #[test]
    fn selects_first_three_surviving_lines() {
        let raw = "\n  Current through the valley  \n[markup]\nSignal finds the waiting shore\nLight becomes the water\nExtra trailing line here\n";
        let lines = select_poem_lines(raw).unwrap();
        assert_eq!(
            lines,
            [
                "Current through the valley".to_string(),
                "Signal finds the waiting shore".to_string(),
                "Light becomes the water".to_string(),
            ]
        );
    }

    #[test]
    fn too_few_surviving_lines_is_none() {
        assert!(select_poem_lines("only line\nsecond line").is_none());
        assert!(select_poem_lines("").is_none());
    }
}
