use super::engine::TeraEngine;
use crate::error::PromptError;
use crate::fallback;
use crate::generate::PredictionSlot;
use crate::profile::{NgramOrder, Profile};
use tera::Context;

const POEM_TEMPLATE: &str = "\
Write a three-line poem blending nature and technology.

Theme: rivers
Poem:
Current through the valley
Signal finds the waiting shore
Light becomes the water

Theme: memory
Poem:
Old leaves hold the archive
Roots remember every season
Spring restores the garden

Theme: {{ theme }}
Poem:
{{ lead }}";

const PREDICTION_TEMPLATE: &str = "\
Complete each fortune in 5 to 15 words.

Fortune about rain -> fresh ideas arrive once you stop waiting for them
Fortune about travel -> a small detour becomes the best part of the road
Fortune about music -> an old rhythm returns carrying a brand new meaning

Fortune about {{ anchor }} ->";

const POEM_NAME: &str = "poem";
const PREDICTION_NAME: &str = "prediction";

/// Leading phrase appended after the poem header so the completion starts
/// mid-line instead of echoing the few-shot structure.
const POEM_LEAD: &str = "The";

/// Ensure the default templates are registered in the engine.
fn ensure_defaults(engine: &mut TeraEngine) -> Result<(), PromptError> {
    engine.add_template(POEM_NAME, POEM_TEMPLATE)?;
    engine.add_template(PREDICTION_NAME, PREDICTION_TEMPLATE)?;
    Ok(())
}

/// Render the poem prompt for a profile.
///
/// Embeds the single highest-ranked theme into a fixed two-example few-shot
/// template. Pure and deterministic; never consults the backend.
pub fn build_poem_prompt(engine: &mut TeraEngine, profile: &Profile) -> Result<String, PromptError> {
    ensure_defaults(engine)?;

    let theme = profile
        .top_theme()
        .map_or_else(|| fallback::DEFAULT_POEM_THEME.to_string(), |t| t.title.to_lowercase());

    let mut ctx = Context::new();
    ctx.insert("theme", &theme);
    ctx.insert("lead", POEM_LEAD);
    engine.render(POEM_NAME, &ctx)
}

/// Render the prediction prompt for one slot.
///
/// Each slot anchors the fortune to a distinct profile fact; the template
/// carries three worked examples and an explicit continuation marker.
pub fn build_prediction_prompt(
    engine: &mut TeraEngine,
    profile: &Profile,
    slot: PredictionSlot,
) -> Result<String, PromptError> {
    ensure_defaults(engine)?;

    let mut ctx = Context::new();
    ctx.insert("anchor", &anchor_for(profile, slot));
    engine.render(PREDICTION_NAME, &ctx)
}

/// The profile fact anchoring one prediction slot, with the same literal
/// defaults the fallback synthesizer uses.
fn anchor_for(profile: &Profile, slot: PredictionSlot) -> String {
    match slot {
        PredictionSlot::TopTheme => profile
            .top_theme()
            .map_or_else(|| fallback::DEFAULT_PREDICTION_THEME.to_string(), |t| {
                t.title.to_lowercase()
            }),
        PredictionSlot::Archetype => profile
            .archetype_name()
            .unwrap_or(fallback::DEFAULT_PREDICTION_ARCHETYPE)
            .to_string(),
        PredictionSlot::TopPhrase => profile
            .top_phrase(NgramOrder::Unigram)
            .map_or_else(|| fallback::DEFAULT_PREDICTION_PHRASE.to_string(), |p| {
                p.phrase.clone()
            }),
        PredictionSlot::SecondTheme => profile
            .second_theme()
            .map_or_else(|| fallback::DEFAULT_SECOND_THEME.to_string(), |t| {
                t.title.to_lowercase()
            }),
    }
}
