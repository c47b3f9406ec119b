//! Gallery CRUD over saved ads

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::extract::{ApiJson, ApiQuery};
use crate::error::{AppError, Result};
use crate::gallery::model::{Ad, AdUpdate, GeneratedImage, NewAd};
use crate::gallery::ImageRemoval;
use crate::prompt::fields::filled_text;
use crate::prompt::GenerationParams;
use crate::AppState;

const DEFAULT_PAGE_SIZE: usize = 50;
const DEFAULT_SIZE: &str = "1024x1024";
const SAVED_MODE: &str = "custom";

fn ad_not_found() -> AppError {
    AppError::NotFound("Ad not found".to_string())
}

#[derive(Debug, Deserialize)]
pub struct SaveToGalleryRequest {
    #[serde(default)]
    pub workspace_id: Option<String>,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub params: GenerationParams,
    #[serde(default)]
    pub images: Vec<GeneratedImage>,
    #[serde(default)]
    pub size: Option<String>,
}

#[derive(Serialize)]
pub struct SaveToGalleryResponse {
    success: bool,
    ad_id: String,
    message: String,
}

/// POST /api/save-to-gallery
pub async fn save_to_gallery(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<SaveToGalleryRequest>,
) -> Result<(StatusCode, Json<SaveToGalleryResponse>)> {
    let image_count = request.images.len();
    let ad = NewAd {
        workspace_id: filled_text(&request.workspace_id)
            .unwrap_or(&state.settings.workspace.id)
            .to_string(),
        prompt: request.prompt,
        params: request.params,
        images: request.images,
        size: filled_text(&request.size).unwrap_or(DEFAULT_SIZE).to_string(),
        mode: SAVED_MODE.to_string(),
    };

    let ad_id = state.ads.create(ad).await?;

    Ok((
        StatusCode::CREATED,
        Json(SaveToGalleryResponse {
            success: true,
            ad_id,
            message: format!("Saved {} images to gallery", image_count),
        }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct ListAdsQuery {
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub skip: Option<usize>,
    #[serde(default)]
    pub aspect_ratio: Option<String>,
}

#[derive(Serialize)]
pub struct ListAdsResponse {
    success: bool,
    total: usize,
    count: usize,
    ads: Vec<Ad>,
}

/// GET /api/ads
pub async fn list_ads(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<ListAdsQuery>,
) -> Result<Json<ListAdsResponse>> {
    let page = state
        .ads
        .list(
            &state.settings.workspace.id,
            query.skip.unwrap_or(0),
            query.limit.unwrap_or(DEFAULT_PAGE_SIZE),
            filled_text(&query.aspect_ratio),
        )
        .await?;

    Ok(Json(ListAdsResponse {
        success: true,
        total: page.total,
        count: page.ads.len(),
        ads: page.ads,
    }))
}

#[derive(Serialize)]
pub struct AdResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
    ad: Ad,
}

/// GET /api/ads/:id
pub async fn get_ad(
    State(state): State<Arc<AppState>>,
    Path(ad_id): Path<String>,
) -> Result<Json<AdResponse>> {
    let ad = state.ads.get(&ad_id).await?.ok_or_else(ad_not_found)?;
    Ok(Json(AdResponse {
        success: true,
        message: None,
        ad,
    }))
}

/// PUT /api/ads/:id
pub async fn update_ad(
    State(state): State<Arc<AppState>>,
    Path(ad_id): Path<String>,
    ApiJson(update): ApiJson<AdUpdate>,
) -> Result<Json<AdResponse>> {
    let ad = state
        .ads
        .update_metadata(&ad_id, update)
        .await?
        .ok_or_else(ad_not_found)?;

    Ok(Json(AdResponse {
        success: true,
        message: Some("Ad updated successfully"),
        ad,
    }))
}

#[derive(Serialize)]
pub struct DeleteAdResponse {
    success: bool,
    message: &'static str,
    deleted_files: usize,
}

/// DELETE /api/ads/:id
///
/// The record goes first; files are then removed best effort.
pub async fn delete_ad(
    State(state): State<Arc<AppState>>,
    Path(ad_id): Path<String>,
) -> Result<Json<DeleteAdResponse>> {
    let ad = state.ads.delete(&ad_id).await?.ok_or_else(ad_not_found)?;

    let mut deleted_files = 0;
    for image in &ad.images {
        if state.storage.delete(&image.filename).await {
            deleted_files += 1;
        }
    }
    info!(ad_id = %ad.id, deleted_files, "Deleted ad");

    Ok(Json(DeleteAdResponse {
        success: true,
        message: "Ad deleted successfully",
        deleted_files,
    }))
}

#[derive(Serialize)]
pub struct DeleteImageResponse {
    success: bool,
    message: String,
    remaining_images: usize,
}

/// DELETE /api/ads/:id/images/:filename
pub async fn delete_image(
    State(state): State<Arc<AppState>>,
    Path((ad_id, filename)): Path<(String, String)>,
) -> Result<Json<DeleteImageResponse>> {
    let remaining = match state.ads.remove_image(&ad_id, &filename).await? {
        ImageRemoval::Removed(images) => images,
        ImageRemoval::AdNotFound => return Err(ad_not_found()),
        ImageRemoval::ImageNotFound => {
            return Err(AppError::NotFound("Image not found in ad".to_string()))
        }
    };

    if !state.storage.delete(&filename).await {
        warn!(ad_id = %ad_id, filename = %filename, "Image removed from ad but no stored file was deleted");
    }

    Ok(Json(DeleteImageResponse {
        success: true,
        message: format!("Image {} deleted successfully", filename),
        remaining_images: remaining.len(),
    }))
}

#[derive(Serialize)]
pub struct DeleteAllResponse {
    success: bool,
    deleted_count: usize,
    message: String,
}

/// DELETE /api/delete-all-ads
pub async fn delete_all_ads(State(state): State<Arc<AppState>>) -> Result<Json<DeleteAllResponse>> {
    let deleted_count = state.ads.delete_workspace(&state.settings.workspace.id).await?;
    Ok(Json(DeleteAllResponse {
        success: true,
        deleted_count,
        message: format!("Deleted {} ads from gallery", deleted_count),
    }))
}
