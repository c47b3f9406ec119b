//! Image generation - size presets and the provider dispatcher

pub mod dispatcher;
pub mod size;

pub use dispatcher::{GenerationReport, ImageDispatcher, ImageOutcome, OutcomeStatus};
pub use size::{AspectRatio, ImageSize};
