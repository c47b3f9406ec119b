//! Ad repository over the `generated_ads` collection

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeSet;
use tracing::info;
use uuid::Uuid;

use crate::error::Result;
use crate::gallery::model::{next_timestamp, Ad, AdUpdate, GeneratedImage, NewAd, WorkspaceStats};
use crate::gallery::store::{Collection, DocumentStore};

pub const ADS_COLLECTION: &str = "generated_ads";

/// Result of removing one image from an ad
#[derive(Debug, Clone, PartialEq)]
pub enum ImageRemoval {
    AdNotFound,
    ImageNotFound,
    /// Images left on the ad
    Removed(Vec<GeneratedImage>),
}

/// Page of ads plus the total matching count
#[derive(Debug, Clone)]
pub struct AdPage {
    pub ads: Vec<Ad>,
    pub total: usize,
}

#[async_trait]
pub trait AdRepository: Send + Sync {
    /// Validate and store a new ad, returning its id
    async fn create(&self, ad: NewAd) -> Result<String>;

    async fn get(&self, id: &str) -> Result<Option<Ad>>;

    /// Newest first, optionally filtered by `params.aspect_ratio`
    async fn list(
        &self,
        workspace_id: &str,
        skip: usize,
        limit: usize,
        aspect_ratio: Option<&str>,
    ) -> Result<AdPage>;

    async fn update_metadata(&self, id: &str, update: AdUpdate) -> Result<Option<Ad>>;

    /// Drop one image from an ad; an ad that does not hold `filename` is left untouched
    async fn remove_image(&self, id: &str, filename: &str) -> Result<ImageRemoval>;

    /// The removed ad, for cleaning up its files
    async fn delete(&self, id: &str) -> Result<Option<Ad>>;

    async fn delete_workspace(&self, workspace_id: &str) -> Result<usize>;

    async fn workspace_stats(&self, workspace_id: &str) -> Result<WorkspaceStats>;

    async fn workspaces(&self) -> Result<Vec<String>>;
}

/// [`AdRepository`] backed by a [`Collection`]
pub struct DocumentAdRepository {
    ads: Collection<Ad>,
}

impl DocumentAdRepository {
    pub async fn open(store: &DocumentStore) -> Result<Self> {
        Ok(Self {
            ads: store.collection(ADS_COLLECTION).await?,
        })
    }

    fn distinct_workspaces(&self) -> Vec<String> {
        self.ads
            .find(|_| true)
            .into_iter()
            .map(|ad| ad.workspace_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[async_trait]
impl AdRepository for DocumentAdRepository {
    async fn create(&self, ad: NewAd) -> Result<String> {
        ad.validate()?;

        let id = Uuid::new_v4().simple().to_string();
        let now = Utc::now();
        let image_count = ad.images.len();
        let doc = Ad {
            id: id.clone(),
            workspace_id: ad.workspace_id,
            prompt: ad.prompt,
            params: ad.params,
            images: ad.images,
            mode: ad.mode,
            size: ad.size,
            created_at: now,
            updated_at: now,
            custom_note: None,
            tags: None,
        };

        self.ads.insert(&id, doc).await?;
        info!(ad_id = %id, images = image_count, "Saved ad to gallery");
        Ok(id)
    }

    async fn get(&self, id: &str) -> Result<Option<Ad>> {
        Ok(self.ads.get(id))
    }

    async fn list(
        &self,
        workspace_id: &str,
        skip: usize,
        limit: usize,
        aspect_ratio: Option<&str>,
    ) -> Result<AdPage> {
        let mut ads = self.ads.find(|ad| {
            ad.workspace_id == workspace_id
                && aspect_ratio.map_or(true, |ratio| ad.aspect_ratio() == Some(ratio))
        });
        let total = ads.len();

        ads.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        let ads = ads.into_iter().skip(skip).take(limit).collect();

        Ok(AdPage { ads, total })
    }

    async fn update_metadata(&self, id: &str, update: AdUpdate) -> Result<Option<Ad>> {
        update.validate()?;

        self.ads
            .update(id, move |ad| {
                if let Some(params) = update.params {
                    ad.params = params;
                }
                if let Some(note) = update.custom_note {
                    ad.custom_note = Some(note);
                }
                if let Some(tags) = update.tags {
                    ad.tags = Some(tags);
                }
                ad.updated_at = next_timestamp(ad.updated_at);
            })
            .await
    }

    async fn remove_image(&self, id: &str, filename: &str) -> Result<ImageRemoval> {
        let updated = self
            .ads
            .update_if(id, |ad| {
                let before = ad.images.len();
                ad.images.retain(|image| image.filename != filename);
                if ad.images.len() == before {
                    return false;
                }
                ad.updated_at = next_timestamp(ad.updated_at);
                true
            })
            .await?;

        Ok(match updated {
            None => ImageRemoval::AdNotFound,
            Some((_, false)) => ImageRemoval::ImageNotFound,
            Some((ad, true)) => ImageRemoval::Removed(ad.images),
        })
    }

    async fn delete(&self, id: &str) -> Result<Option<Ad>> {
        self.ads.remove(id).await
    }

    async fn delete_workspace(&self, workspace_id: &str) -> Result<usize> {
        let deleted = self
            .ads
            .remove_where(|ad| ad.workspace_id == workspace_id)
            .await?;
        info!(workspace_id, deleted, "Deleted workspace ads");
        Ok(deleted)
    }

    async fn workspace_stats(&self, workspace_id: &str) -> Result<WorkspaceStats> {
        let ads = self.ads.find(|ad| ad.workspace_id == workspace_id);
        let workspaces = self.distinct_workspaces();

        Ok(WorkspaceStats {
            total_ads: ads.len(),
            total_images: ads.iter().map(|ad| ad.images.len()).sum(),
            total_workspaces: workspaces.len(),
            workspaces,
        })
    }

    async fn workspaces(&self) -> Result<Vec<String>> {
        Ok(self.distinct_workspaces())
    }
}
