#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::return_self_not_must_use
)]

pub mod backend;
pub mod config;
pub mod error;
pub mod fallback;
pub mod generate;
pub mod profile;
pub mod prompt;
pub mod validate;

pub use backend::{
    BackendHandle, BackendLoader, BackendState, Device, DeviceCaps, LoadProgress, LoadStatus,
    ProgressObserver, RawResponse, TextBackend,
};
pub use config::{GenConfig, SamplingConfig};
pub use error::{Result, SibylError};
pub use generate::{Generator, PredictionSlot, UnitKind};
pub use profile::{Archetype, NgramOrder, PhraseEntry, Profile, Theme, UsageStats};
