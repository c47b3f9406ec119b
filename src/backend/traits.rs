//! Common traits and types for the remote AI providers

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::generation::size::ImageSize;
use crate::media::EncodedImage;

/// Which image provider tier a request targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageModel {
    Free,
    Paid,
}

impl ImageModel {
    /// Anything other than `paid` selects the free tier
    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("paid") => ImageModel::Paid,
            _ => ImageModel::Free,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageModel::Free => "free",
            ImageModel::Paid => "paid",
        }
    }
}

/// Image payload handed back by a provider
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderImage {
    /// Raw image bytes returned inline
    Inline(Vec<u8>),
    /// Temporary URL the image must be downloaded from
    Remote(String),
}

/// Text completion backend used for prompt enhancement and field autofill
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &str;

    /// Single-turn completion, returns the trimmed reply text
    async fn complete(&self, prompt: &str, temperature: f32) -> Result<String>;
}

/// Vision backend that reads a reference image
#[async_trait]
pub trait VisionAnalyzer: Send + Sync {
    fn name(&self) -> &str;

    async fn analyze(&self, image: &EncodedImage, instruction: &str) -> Result<String>;
}

/// Image generation backend
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &str;

    /// Whether the provider honours the requested size or always renders square
    fn supports_size(&self) -> bool;

    /// Generate exactly one image
    async fn generate(&self, prompt: &str, size: ImageSize) -> Result<ProviderImage>;
}
