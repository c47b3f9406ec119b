//! Backend module - provider traits and the Claude, FLUX and Gemini clients

pub mod claude;
pub mod flux;
pub mod gemini;
pub mod traits;

pub use claude::ClaudeClient;
pub use flux::FluxClient;
pub use gemini::{GeminiClient, InlineImage};
pub use traits::{ImageModel, ImageProvider, ProviderImage, TextGenerator, VisionAnalyzer};
