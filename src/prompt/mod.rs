//! Prompt pipeline - field checks, base composition, enhancement and rating

pub mod catalog;
pub mod composer;
pub mod enhancer;
pub mod fields;
pub mod params;
pub mod rating;
pub mod reference;

pub use composer::compose;
pub use enhancer::PromptEnhancer;
pub use fields::{is_filled, Filled};
pub use params::{FeatureList, GenerationParams};
pub use rating::{assign_ratings, build_variations, PromptVariation};
