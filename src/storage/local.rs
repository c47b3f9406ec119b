//! Local filesystem store used when remote storage is unavailable

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::storage::naming::is_safe_name;
use crate::storage::{ObjectStore, StorageKind};

/// Writes images into a directory served under `/images`
pub struct LocalStore {
    storage_path: PathBuf,
    public_base_url: String,
}

impl LocalStore {
    pub fn new(storage_path: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            storage_path: storage_path.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Ensure the storage directory exists
    pub async fn ensure_storage_dir(&self) -> Result<()> {
        if !fs::try_exists(&self.storage_path).await? {
            fs::create_dir_all(&self.storage_path).await?;
            debug!(path = ?self.storage_path, "Created storage directory");
        }
        Ok(())
    }

    /// Public URL for a stored file
    pub fn url_for(&self, name: &str) -> String {
        format!("{}/images/{}", self.public_base_url, name)
    }

    fn path_for(&self, name: &str) -> Result<PathBuf> {
        if !is_safe_name(name) {
            return Err(AppError::InvalidRequest(format!("Invalid filename: {}", name)));
        }
        Ok(self.storage_path.join(name))
    }
}

#[async_trait]
impl ObjectStore for LocalStore {
    fn kind(&self) -> StorageKind {
        StorageKind::Local
    }

    async fn put(&self, name: &str, data: &[u8]) -> Result<String> {
        let file_path = self.path_for(name)?;
        self.ensure_storage_dir().await?;

        fs::write(&file_path, data).await?;
        debug!(path = ?file_path, size = data.len(), "Saved image file");

        Ok(self.url_for(name))
    }

    async fn delete(&self, name: &str) -> Result<bool> {
        let file_path = self.path_for(name)?;
        match fs::remove_file(&file_path).await {
            Ok(()) => {
                debug!(path = ?file_path, "Deleted image file");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, name: &str) -> Result<bool> {
        Ok(fs::try_exists(self.path_for(name)?).await?)
    }
}
