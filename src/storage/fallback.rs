//! Ordered storage tiers: remote first, local as the last resort

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{AppError, Result};
use crate::storage::naming::image_filename;
use crate::storage::{ObjectStore, StorageKind};

/// Result of a successful write
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredImage {
    pub filename: String,
    pub url: String,
    pub storage: StorageKind,
}

/// Writes to the first tier that accepts an image
pub struct FallbackStore {
    tiers: Vec<Arc<dyn ObjectStore>>,
    http: reqwest::Client,
}

impl FallbackStore {
    pub fn new(tiers: Vec<Arc<dyn ObjectStore>>, download_timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(download_timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { tiers, http })
    }

    fn available_tiers(&self) -> impl Iterator<Item = &Arc<dyn ObjectStore>> {
        self.tiers.iter().filter(|tier| tier.is_available())
    }

    /// Kind of the tier new images go to first
    pub fn primary_kind(&self) -> Option<StorageKind> {
        self.available_tiers().next().map(|tier| tier.kind())
    }

    pub fn is_available(&self, kind: StorageKind) -> bool {
        self.available_tiers().any(|tier| tier.kind() == kind)
    }

    /// Write under an explicit name, trying each tier in order
    pub async fn put(&self, filename: &str, data: &[u8]) -> Result<StoredImage> {
        let mut last_error = None;

        for tier in &self.tiers {
            if !tier.is_available() {
                debug!(storage = tier.kind().as_str(), "Storage tier unavailable, skipping");
                continue;
            }

            match tier.put(filename, data).await {
                Ok(url) => {
                    info!(storage = tier.kind().as_str(), filename = %filename, "Stored image");
                    return Ok(StoredImage {
                        filename: filename.to_string(),
                        url,
                        storage: tier.kind(),
                    });
                }
                Err(e) => {
                    warn!(storage = tier.kind().as_str(), filename = %filename, error = %e, "Storage tier failed, trying next");
                    last_error = Some(e);
                }
            }
        }

        Err(AppError::Storage(match last_error {
            Some(e) => format!("All storage tiers failed for {}: {}", filename, e),
            None => "No storage tier is available".to_string(),
        }))
    }

    /// Store raw image bytes under a freshly generated name
    pub async fn store_bytes(&self, data: &[u8], workspace_id: &str, category: &str) -> Result<StoredImage> {
        self.put(&image_filename(workspace_id, category), data).await
    }

    /// Download an image once, then store it like inline bytes
    pub async fn store_from_url(&self, url: &str, workspace_id: &str, category: &str) -> Result<StoredImage> {
        debug!(url = %url, "Downloading generated image");
        let bytes = self
            .http
            .get(url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| download_error(url, e))?
            .bytes()
            .await
            .map_err(|e| download_error(url, e))?;

        self.store_bytes(&bytes, workspace_id, category).await
    }

    /// Delete from the first available tier that has the object
    pub async fn delete(&self, filename: &str) -> bool {
        for tier in self.available_tiers() {
            match tier.exists(filename).await {
                Ok(true) => {
                    return match tier.delete(filename).await {
                        Ok(deleted) => deleted,
                        Err(e) => {
                            warn!(storage = tier.kind().as_str(), filename = %filename, error = %e, "Delete failed");
                            false
                        }
                    };
                }
                Ok(false) => continue,
                Err(e) => {
                    warn!(storage = tier.kind().as_str(), filename = %filename, error = %e, "Existence check failed");
                }
            }
        }
        debug!(filename = %filename, "Image not found in any storage tier");
        false
    }
}

fn download_error(url: &str, error: reqwest::Error) -> AppError {
    if error.is_timeout() {
        AppError::Timeout(format!("Downloading {} took too long", url))
    } else {
        AppError::HttpClient(error)
    }
}
