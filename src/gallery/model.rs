//! Gallery documents: ads, their images, users and workspace stats

use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::error::{AppError, Result};
use crate::generation::size::AspectRatio;
use crate::prompt::params::GenerationParams;
use crate::storage::{StorageKind, StoredImage};

static SIZE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+x\d+$").expect("valid regex"));

/// How an image reached storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSource {
    /// Downloaded from a provider URL
    Url,
    /// Returned inline by the provider
    Base64,
}

/// One stored image as referenced by an ad
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub filename: String,
    pub url: String,
    #[serde(rename = "type")]
    pub source: ImageSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageKind>,
}

impl GeneratedImage {
    pub fn from_stored(stored: StoredImage, source: ImageSource) -> Self {
        Self {
            filename: stored.filename,
            url: stored.url,
            source,
            storage: Some(stored.storage),
        }
    }
}

/// A saved generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ad {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub workspace_id: String,
    pub prompt: String,
    pub params: GenerationParams,
    pub images: Vec<GeneratedImage>,
    pub mode: String,
    pub size: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl Ad {
    pub fn aspect_ratio(&self) -> Option<&str> {
        self.params.aspect_ratio.as_deref()
    }
}

/// Input for creating an ad
#[derive(Debug, Clone)]
pub struct NewAd {
    pub workspace_id: String,
    pub prompt: String,
    pub params: GenerationParams,
    pub images: Vec<GeneratedImage>,
    pub size: String,
    pub mode: String,
}

impl NewAd {
    /// Check the invariants every stored ad must satisfy
    pub fn validate(&self) -> Result<()> {
        if self.workspace_id.trim().is_empty() {
            return Err(AppError::InvalidRequest("workspace_id must not be empty".to_string()));
        }
        if self.images.is_empty() {
            return Err(AppError::InvalidRequest("No images provided".to_string()));
        }
        validate_size(&self.size)?;
        if let Some(ratio) = self.params.aspect_ratio.as_deref() {
            ratio.parse::<AspectRatio>()?;
        }
        Ok(())
    }
}

/// Partial update of an ad's metadata; `None` leaves a field untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdUpdate {
    #[serde(default)]
    pub params: Option<GenerationParams>,
    #[serde(default)]
    pub custom_note: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl AdUpdate {
    pub fn validate(&self) -> Result<()> {
        if let Some(ratio) = self.params.as_ref().and_then(|p| p.aspect_ratio.as_deref()) {
            ratio.parse::<AspectRatio>()?;
        }
        Ok(())
    }
}

/// `WxH` with decimal dimensions
pub fn validate_size(size: &str) -> Result<()> {
    if SIZE_PATTERN.is_match(size) {
        Ok(())
    } else {
        Err(AppError::InvalidRequest(format!("Invalid size: {}", size)))
    }
}

/// Next `updated_at` for a document, always strictly after the previous one
pub fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

/// Subscription record keyed by the caller-supplied user id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub is_paid: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Totals for one workspace plus the list of known workspaces
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkspaceStats {
    pub total_ads: usize,
    pub total_images: usize,
    pub total_workspaces: usize,
    pub workspaces: Vec<String>,
}
