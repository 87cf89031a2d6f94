use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Sampling parameters sent with every backend request.
///
/// Fixed per process: non-zero temperature with nucleus sampling, a
/// repetition penalty, and an n-gram repeat block. The defaults are tuned
/// for short creative completions, not factual answers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    pub temperature: f64,
    pub top_p: f64,
    pub repetition_penalty: f64,
    pub no_repeat_ngram: u8,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            temperature: 0.85,
            top_p: 0.92,
            repetition_penalty: 1.3,
            no_repeat_ngram: 3,
        }
    }
}

/// Generation pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenConfig {
    /// Retry budget per generation unit.
    pub max_attempts: u32,
    /// Token budget for one poem attempt.
    pub poem_max_tokens: u32,
    /// Token budget for one prediction attempt.
    pub prediction_max_tokens: u32,
    pub sampling: SamplingConfig,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            poem_max_tokens: 60,
            prediction_max_tokens: 24,
            sampling: SamplingConfig::default(),
        }
    }
}

impl GenConfig {
    /// Load and validate a config from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&raw).map_err(|e| ConfigError::Load(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::Validation("max_attempts must be >= 1".into()));
        }
        if self.poem_max_tokens == 0 || self.prediction_max_tokens == 0 {
            return Err(ConfigError::Validation("token budgets must be >= 1".into()));
        }
        if self.sampling.temperature <= 0.0 {
            return Err(ConfigError::Validation(
                "sampling.temperature must be > 0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.sampling.top_p) {
            return Err(ConfigError::Validation(
                "sampling.top_p must be in [0, 1]".into(),
            ));
        }
        Ok(())
    }
}
