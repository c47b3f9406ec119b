//! Sequential image generation against the free or premium provider

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::backend::traits::{ImageModel, ImageProvider, ProviderImage};
use crate::error::{AppError, Result};
use crate::gallery::model::{GeneratedImage, ImageSource};
use crate::generation::size::{AspectRatio, ImageSize};
use crate::prompt::params::GenerationParams;
use crate::storage::FallbackStore;

/// What happened to one requested image
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageOutcome {
    pub index: usize,
    #[serde(flatten)]
    pub status: OutcomeStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum OutcomeStatus {
    Success { image: GeneratedImage },
    Failed { reason: String },
}

/// Images that made it to storage, in request order, plus every outcome
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub images: Vec<GeneratedImage>,
    pub size: String,
    pub total: usize,
    pub outcomes: Vec<ImageOutcome>,
}

/// Routes generation to a provider tier and stores each result
pub struct ImageDispatcher {
    premium: Option<Arc<dyn ImageProvider>>,
    free: Option<Arc<dyn ImageProvider>>,
    storage: Arc<FallbackStore>,
    workspace_id: String,
    request_gap: Duration,
}

impl ImageDispatcher {
    pub fn new(
        premium: Option<Arc<dyn ImageProvider>>,
        free: Option<Arc<dyn ImageProvider>>,
        storage: Arc<FallbackStore>,
        workspace_id: impl Into<String>,
        request_gap: Duration,
    ) -> Self {
        Self {
            premium,
            free,
            storage,
            workspace_id: workspace_id.into(),
            request_gap,
        }
    }

    pub fn has_provider(&self, model: ImageModel) -> bool {
        self.provider(model).is_ok()
    }

    fn provider(&self, model: ImageModel) -> Result<&Arc<dyn ImageProvider>> {
        let (provider, label) = match model {
            ImageModel::Paid => (&self.premium, "Premium image provider"),
            ImageModel::Free => (&self.free, "Free image provider"),
        };
        provider
            .as_ref()
            .ok_or_else(|| AppError::ProviderNotConfigured(label.to_string()))
    }

    /// Generate `count` images one after another.
    ///
    /// Only a missing provider is an error; every per-image failure becomes
    /// a failed outcome and the batch carries on.
    pub async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
        count: usize,
        model: ImageModel,
    ) -> Result<GenerationReport> {
        let provider = self.provider(model)?;
        let size = AspectRatio::size_for(params.aspect_ratio.as_deref());
        let category = params.storage_category();

        if !provider.supports_size() && !size.is_square() {
            warn!(
                provider = provider.name(),
                requested = %size,
                "Provider only renders square images, requested size will be ignored"
            );
        }

        info!(provider = provider.name(), model = model.as_str(), count, size = %size, "Generating images");

        let mut images = Vec::with_capacity(count);
        let mut outcomes = Vec::with_capacity(count);

        for index in 0..count {
            if index > 0 {
                tokio::time::sleep(self.request_gap).await;
            }

            let status = match self.generate_one(provider.as_ref(), prompt, size, category).await {
                Ok(image) => {
                    info!(index, filename = %image.filename, "Image stored");
                    images.push(image.clone());
                    OutcomeStatus::Success { image }
                }
                Err(e) => {
                    warn!(index, provider = provider.name(), error = %e, "Image generation failed");
                    OutcomeStatus::Failed {
                        reason: e.to_string(),
                    }
                }
            };
            outcomes.push(ImageOutcome { index, status });
        }

        info!(requested = count, generated = images.len(), "Generation finished");

        Ok(GenerationReport {
            total: images.len(),
            images,
            size: size.to_string(),
            outcomes,
        })
    }

    async fn generate_one(
        &self,
        provider: &dyn ImageProvider,
        prompt: &str,
        size: ImageSize,
        category: &str,
    ) -> Result<GeneratedImage> {
        match provider.generate(prompt, size).await? {
            ProviderImage::Inline(bytes) => {
                let stored = self
                    .storage
                    .store_bytes(&bytes, &self.workspace_id, category)
                    .await?;
                Ok(GeneratedImage::from_stored(stored, ImageSource::Base64))
            }
            ProviderImage::Remote(url) => {
                let stored = self
                    .storage
                    .store_from_url(&url, &self.workspace_id, category)
                    .await?;
                Ok(GeneratedImage::from_stored(stored, ImageSource::Url))
            }
        }
    }
}
