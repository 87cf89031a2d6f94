use std::collections::HashMap;

/// A named pass/fail heuristic applied to candidate text.
///
/// Rules are independent and composable; the validator for a unit kind is
/// the conjunction of the applicable rule chains.
pub struct Rule {
    pub name: &'static str,
    pub rejects: fn(&str) -> bool,
}

/// Rules applied to every unit kind.
pub const COMMON_RULES: &[Rule] = &[
    Rule {
        name: "meta_opener",
        rejects: opens_with_filler,
    },
    Rule {
        name: "identity_leak",
        rejects: leaks_identity,
    },
    Rule {
        name: "repeated_chars",
        rejects: has_repeated_char_run,
    },
];

/// Rules applied per poem line.
pub const POEM_LINE_RULES: &[Rule] = &[
    Rule {
        name: "line_bounds",
        rejects: poem_line_out_of_bounds,
    },
    Rule {
        name: "structural_noise",
        rejects: has_structural_noise,
    },
];

/// Rules applied per prediction sentence.
pub const PREDICTION_RULES: &[Rule] = &[
    Rule {
        name: "sentence_bounds",
        rejects: prediction_out_of_bounds,
    },
    Rule {
        name: "word_repetition",
        rejects: has_word_repetition,
    },
    Rule {
        name: "banned_content",
        rejects: has_banned_content,
    },
];

/// Conversational openers that mean the model addressed the user instead of
/// completing the creative text.
const FILLER_OPENERS: &[&str] = &[
    "here", "here's", "sure", "let", "let's", "lets", "i", "i'm", "im", "please", "okay",
];

/// Self-reference, legal/citation markers, and URLs leaked into output.
const IDENTITY_MARKERS: &[&str] = &[
    "llama",
    "language model",
    "as an ai",
    "openai",
    "http://",
    "https://",
    "www.",
    "copyright",
    "all rights reserved",
    "\u{a9}",
];

/// Canned phrases and assistant-register vocabulary banned from predictions.
const BANNED_PHRASES: &[&str] = &[
    "level up",
    "you will be",
    "help",
    "assist",
    "provide",
    "question",
];

fn opens_with_filler(text: &str) -> bool {
    let first = text.split_whitespace().next().unwrap_or("");
    let first = first
        .trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
        .to_lowercase();
    FILLER_OPENERS.contains(&first.as_str())
}

fn leaks_identity(text: &str) -> bool {
    let lower = text.to_lowercase();
    IDENTITY_MARKERS.iter().any(|m| lower.contains(m))
}

/// Any run of the same character four or more times in a row.
fn has_repeated_char_run(text: &str) -> bool {
    let mut prev = None;
    let mut run = 0;
    for c in text.chars() {
        if Some(c) == prev {
            run += 1;
            if run >= 4 {
                return true;
            }
        } else {
            prev = Some(c);
            run = 1;
        }
    }
    false
}

fn poem_line_out_of_bounds(text: &str) -> bool {
    let chars = text.chars().count();
    let words = text.split_whitespace().count();
    !(4..=50).contains(&chars) || !(2..=8).contains(&words)
}

/// Bracket/brace/pipe/backslash characters or a trailing colon: the model
/// echoed formatting markup rather than content.
fn has_structural_noise(text: &str) -> bool {
    text.chars()
        .any(|c| matches!(c, '[' | ']' | '{' | '}' | '|' | '\\'))
        || text.trim_end().ends_with(':')
}

fn prediction_out_of_bounds(text: &str) -> bool {
    let chars = text.chars().count();
    let words = text.split_whitespace().count();
    !(5..=80).contains(&chars) || !(3..=20).contains(&words)
}

/// Reusable repetition check: any token of length >= 3 appearing three or
/// more times, or two identical adjacent two-token windows (phrase loops
/// such as "learn to learn to").
pub fn has_word_repetition(text: &str) -> bool {
    let tokens: Vec<String> = text
        .split_whitespace()
        .map(str::to_lowercase)
        .collect();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for token in &tokens {
        if token.chars().count() >= 3 {
            let count = counts.entry(token.as_str()).or_insert(0);
            *count += 1;
            if *count >= 3 {
                return true;
            }
        }
    }

    for i in 0..tokens.len().saturating_sub(3) {
        if tokens[i] == tokens[i + 2] && tokens[i + 1] == tokens[i + 3] {
            return true;
        }
    }
    false
}

fn has_banned_content(text: &str) -> bool {
    let lower = text.to_lowercase();
    if lower.contains('?') || lower.contains("!!") {
        return true;
    }
    if BANNED_PHRASES.iter().any(|p| lower.contains(p)) {
        return true;
    }
    let mut digits = 0;
    for c in lower.chars() {
        if c.is_ascii_digit() {
            digits += 1;
            if digits >= 3 {
                return true;
            }
        } else {
            digits = 0;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filler_openers_are_detected_case_insensitively() {
        assert!(opens_with_filler("Sure, the stars align"));
        assert!(opens_with_filler("I'm predicting great things"));
        assert!(opens_with_filler("Let me write that for you"));
        assert!(!opens_with_filler("The stars align tonight"));
        // Prefix must match the whole first word, not a fragment of it.
        assert!(!opens_with_filler("Imagine a quieter year"));
        assert!(!opens_with_filler(""));
    }

    #[test]
    fn identity_markers_are_detected() {
        assert!(leaks_identity("brought to you by LLaMA"));
        assert!(leaks_identity("see https://example.com"));
        assert!(leaks_identity("Copyright 2024"));
        assert!(!leaks_identity("a quiet river of thought"));
    }

    #[test]
    fn char_runs_of_four_are_rejected() {
        assert!(has_repeated_char_run("weeeee"));
        assert!(has_repeated_char_run("aaaa"));
        assert!(!has_repeated_char_run("weee"));
        assert!(!has_repeated_char_run("balloon"));
    }

    #[test]
    fn poem_line_bounds() {
        assert!(poem_line_out_of_bounds("hi"));
        assert!(poem_line_out_of_bounds("word"));
        assert!(poem_line_out_of_bounds(&"long ".repeat(12)));
        assert!(!poem_line_out_of_bounds("light becomes the water"));
    }

    #[test]
    fn structural_noise_catches_markup() {
        assert!(has_structural_noise("line with [markup]"));
        assert!(has_structural_noise("pipe | delimited"));
        assert!(has_structural_noise("a heading line:"));
        assert!(has_structural_noise("escaped \\n sequence"));
        assert!(!has_structural_noise("a plain poem line"));
    }

    #[test]
    fn prediction_bounds() {
        assert!(prediction_out_of_bounds("too few"));
        assert!(prediction_out_of_bounds(&"word ".repeat(25)));
        assert!(!prediction_out_of_bounds("a small detour becomes the road"));
    }

    #[test]
    fn word_repetition_counts_and_windows() {
        assert!(has_word_repetition("learn and learn and learn again"));
        assert!(has_word_repetition("learn to learn to fly"));
        assert!(has_word_repetition("go go go go"));
        assert!(!has_word_repetition("learn to fly above the canyon"));
        // Short tokens are excluded from the count rule.
        assert!(!has_word_repetition("a b a c a d"));
    }

    #[test]
    fn banned_content_catches_digits_questions_and_register() {
        assert!(has_banned_content("you will be rich"));
        assert!(has_banned_content("in 2024 everything changes"));
        assert!(has_banned_content("will you win?"));
        assert!(has_banned_content("amazing!! incredible"));
        assert!(has_banned_content("I can assist with that"));
        assert!(has_banned_content("time to level up"));
        assert!(!has_banned_content("two new doors open this spring"));
    }
}
