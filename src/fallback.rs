//! Deterministic, backend-free text synthesis.
//!
//! Invoked when generation is exhausted or the backend never came up. Pure
//! over the [`Profile`]: the same input always produces byte-identical
//! output, and every possible profile (including an all-empty one) yields a
//! non-empty, bounded result.

use crate::generate::PredictionSlot;
use crate::profile::{NgramOrder, Profile};

pub const DEFAULT_POEM_THEME: &str = "learning";
pub const DEFAULT_POEM_ARCHETYPE: &str = "Ranger";
pub const DEFAULT_POEM_PHRASE: &str = "curiosity";
pub const DEFAULT_PREDICTION_THEME: &str = "exploring ideas";
pub const DEFAULT_PREDICTION_ARCHETYPE: &str = "Seeker";
pub const DEFAULT_PREDICTION_PHRASE: &str = "wonder";
pub const DEFAULT_SECOND_THEME: &str = "ideas";

/// Three fixed template lines substituting profile facts.
#[must_use]
pub fn poem(profile: &Profile) -> String {
    let archetype = profile.archetype_name().unwrap_or(DEFAULT_POEM_ARCHETYPE);
    let theme = profile
        .top_theme()
        .map_or_else(|| DEFAULT_POEM_THEME.to_string(), |t| t.title.to_lowercase());
    let phrase = capitalize(
        profile
            .top_phrase(NgramOrder::Unigram)
            .map_or(DEFAULT_POEM_PHRASE, |p| p.phrase.as_str()),
    );
    let second = profile
        .second_theme()
        .map_or_else(|| DEFAULT_SECOND_THEME.to_string(), |t| t.title.to_lowercase());

    format!("{archetype} of {theme}\n{phrase} guides the path forward\nTomorrow holds more {second}")
}

/// The fallback sentence for one prediction slot.
#[must_use]
pub fn prediction(profile: &Profile, slot: PredictionSlot) -> String {
    match slot {
        PredictionSlot::TopTheme => {
            let theme = profile.top_theme().map_or_else(
                || DEFAULT_PREDICTION_THEME.to_string(),
                |t| t.title.to_lowercase(),
            );
            format!("A season of {theme} is about to pay off")
        }
        PredictionSlot::Archetype => {
            let archetype = profile
                .archetype_name()
                .unwrap_or(DEFAULT_PREDICTION_ARCHETYPE);
            format!("The {archetype} in you is only getting started")
        }
        PredictionSlot::TopPhrase => {
            let phrase = profile
                .top_phrase(NgramOrder::Unigram)
                .map_or(DEFAULT_PREDICTION_PHRASE, |p| p.phrase.as_str());
            // Doubled message count, floored so the sentence stays sensible
            // for an empty stats record.
            let times = profile.stats.messages.saturating_mul(2).max(2);
            format!("Expect to say {phrase} at least {times} more times")
        }
        PredictionSlot::SecondTheme => {
            let second = profile.second_theme().map_or_else(
                || DEFAULT_SECOND_THEME.to_string(),
                |t| t.title.to_lowercase(),
            );
            format!("Something new in {second} will find you first")
        }
    }
}

/// All four prediction sentences in unit order.
#[must_use]
pub fn predictions(profile: &Profile) -> Vec<String> {
    PredictionSlot::ALL
        .iter()
        .map(|slot| prediction(profile, *slot))
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
