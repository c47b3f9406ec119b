//! Image storage - remote blob storage with an ordered local fallback

pub mod azure;
pub mod fallback;
pub mod local;
pub mod naming;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use azure::AzureBlobStore;
pub use fallback::{FallbackStore, StoredImage};
pub use local::LocalStore;

/// Where an image ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    Azure,
    Local,
}

impl StorageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKind::Azure => "azure",
            StorageKind::Local => "local",
        }
    }
}

/// A flat namespace of named binary objects
#[async_trait]
pub trait ObjectStore: Send + Sync {
    fn kind(&self) -> StorageKind;

    /// Whether the store finished initialising and can take writes
    fn is_available(&self) -> bool {
        true
    }

    /// Store an object and return the URL clients should use to read it
    async fn put(&self, name: &str, data: &[u8]) -> Result<String>;

    /// Remove an object; `false` when it did not exist
    async fn delete(&self, name: &str) -> Result<bool>;

    async fn exists(&self, name: &str) -> Result<bool>;
}
