//! Retry controller: drives prompt -> backend -> normalize -> validate per
//! unit, with bounded attempts and deterministic fallback on exhaustion.

pub mod unit;

pub use unit::{Candidate, PredictionSlot, UnitKind};

use crate::backend::{BackendHandle, ProgressObserver};
use crate::config::GenConfig;
use crate::error::BackendError;
use crate::fallback;
use crate::profile::Profile;
use crate::prompt::{TeraEngine, build_poem_prompt, build_prediction_prompt};
use crate::validate;
use std::sync::Arc;

/// Terminal state of one unit's retry loop.
enum UnitOutcome {
    Accepted(String),
    Exhausted,
    /// The backend reported `Unavailable`; the rest of the batch skips its
    /// retry budget and goes straight to fallback.
    BackendDown,
}

/// Drives generation for a profile. Total with respect to failure: the
/// caller always receives well-formed text, never an error.
pub struct Generator {
    handle: Arc<BackendHandle>,
    config: GenConfig,
}

impl Generator {
    pub fn new(handle: Arc<BackendHandle>, config: GenConfig) -> Self {
        Self { handle, config }
    }

    /// Generate a three-line poem, newline-joined.
    pub async fn poem(&self, profile: &Profile, observer: Option<ProgressObserver>) -> String {
        if let Err(e) = self.handle.acquire(observer.as_ref()).await {
            tracing::warn!(error = %e, "backend unavailable, poem falls back to template");
            return fallback::poem(profile);
        }

        let mut engine = TeraEngine::new();
        // One fixed prompt, reused across every attempt.
        let prompt = match build_poem_prompt(&mut engine, profile) {
            Ok(prompt) => prompt,
            Err(e) => {
                tracing::error!(error = %e, "poem prompt failed to render");
                return fallback::poem(profile);
            }
        };

        match self.poem_unit(&prompt).await {
            UnitOutcome::Accepted(text) => text,
            UnitOutcome::Exhausted | UnitOutcome::BackendDown => fallback::poem(profile),
        }
    }

    /// Generate the four prediction sentences, in fixed unit order.
    pub async fn predictions(
        &self,
        profile: &Profile,
        observer: Option<ProgressObserver>,
    ) -> Vec<String> {
        let mut backend_down = match self.handle.acquire(observer.as_ref()).await {
            Ok(_) => false,
            Err(e) => {
                tracing::warn!(error = %e, "backend unavailable, predictions fall back to templates");
                true
            }
        };

        let mut engine = TeraEngine::new();
        let mut results = Vec::with_capacity(PredictionSlot::ALL.len());
        for slot in PredictionSlot::ALL {
            if backend_down {
                results.push(fallback::prediction(profile, slot));
                continue;
            }
            match self.prediction_unit(&mut engine, profile, slot).await {
                UnitOutcome::Accepted(text) => results.push(text),
                UnitOutcome::Exhausted => results.push(fallback::prediction(profile, slot)),
                UnitOutcome::BackendDown => {
                    backend_down = true;
                    results.push(fallback::prediction(profile, slot));
                }
            }
        }
        results
    }

    async fn poem_unit(&self, prompt: &str) -> UnitOutcome {
        for attempt in 1..=self.config.max_attempts {
            match self
                .handle
                .generate(prompt, self.config.poem_max_tokens)
                .await
            {
                Ok(text) => {
                    let candidate = Candidate::new(UnitKind::PoemLines, attempt, text);
                    if let Some(lines) = validate::select_poem_lines(&candidate.text) {
                        tracing::debug!(attempt, "poem accepted");
                        return UnitOutcome::Accepted(lines.join("\n"));
                    }
                    tracing::debug!(attempt, candidate = %candidate.preview(), "poem rejected");
                }
                Err(BackendError::Unavailable(cause)) => {
                    tracing::warn!(attempt, error = %cause, "backend lost during poem generation");
                    return UnitOutcome::BackendDown;
                }
                Err(e) => {
                    tracing::warn!(attempt, error = %e, "poem attempt failed");
                }
            }
        }
        UnitOutcome::Exhausted
    }

    async fn prediction_unit(
        &self,
        engine: &mut TeraEngine,
        profile: &Profile,
        slot: PredictionSlot,
    ) -> UnitOutcome {
        for attempt in 1..=self.config.max_attempts {
            // Re-rendered every attempt; the poem instead reuses one fixed
            // prompt. Both policies are kept per unit kind.
            let prompt = match build_prediction_prompt(engine, profile, slot) {
                Ok(prompt) => prompt,
                Err(e) => {
                    tracing::error!(slot = ?slot, error = %e, "prediction prompt failed to render");
                    return UnitOutcome::Exhausted;
                }
            };
            match self
                .handle
                .generate(&prompt, self.config.prediction_max_tokens)
                .await
            {
                Ok(text) => {
                    let candidate =
                        Candidate::new(UnitKind::Prediction, attempt, first_line(&text));
                    let verdict = validate::check_prediction(&candidate.text);
                    if verdict.accepted {
                        tracing::debug!(attempt, slot = ?slot, "prediction accepted");
                        return UnitOutcome::Accepted(candidate.text);
                    }
                    tracing::debug!(
                        attempt,
                        slot = ?slot,
                        reason = verdict.reason.unwrap_or("unknown"),
                        candidate = %candidate.preview(),
                        "prediction rejected"
                    );
                }
                Err(BackendError::Unavailable(cause)) => {
                    tracing::warn!(attempt, slot = ?slot, error = %cause, "backend lost during prediction generation");
                    return UnitOutcome::BackendDown;
                }
                Err(e) => {
                    tracing::warn!(attempt, slot = ?slot, error = %e, "prediction attempt failed");
                }
            }
        }
        UnitOutcome::Exhausted
    }
}

/// A prediction completion may trail extra lines (the model continuing the
/// few-shot pattern); only the first non-empty line is the candidate.
fn first_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("")
        .to_string()
}
