use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `sibyl`.
///
/// Each subsystem defines its own error variant. Library callers can match on
/// these to decide recovery strategy; internal code continues to use
/// `anyhow::Result` for ad-hoc context chains. The public generation
/// operations never return any of these: every failure path inside the retry
/// controller resolves to fallback text.
#[derive(Debug, Error)]
pub enum SibylError {
    // ── Backend lifecycle / generation ──────────────────────────────────
    #[error("backend: {0}")]
    Backend(#[from] BackendError),

    // ── Prompt / Template ───────────────────────────────────────────────
    #[error("prompt: {0}")]
    Prompt(#[from] PromptError),

    // ── Config ──────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Profile input ───────────────────────────────────────────────────
    #[error("profile: {0}")]
    Profile(#[from] ProfileError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Backend errors ─────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum BackendError {
    /// Initialization failed: no supported execution device, or the model
    /// load itself errored. Fatal to the generation path for the remainder
    /// of a batch; every remaining unit goes straight to fallback.
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// A single generation attempt produced no usable output. Caught and
    /// counted by the retry controller, never escalated.
    #[error("generation failed: {0}")]
    Generation(String),
}

// ─── Prompt / Template errors ───────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("template render failed: {0}")]
    Render(String),

    #[error("template not found: {0}")]
    NotFound(String),
}

// ─── Config errors ──────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Profile errors ─────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("failed to parse profile: {0}")]
    Parse(String),
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, SibylError>;
