pub mod builder;
pub mod engine;

pub use builder::{build_poem_prompt, build_prediction_prompt};
pub use engine::TeraEngine;
