//! Image generation from a selected prompt

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::extract::ApiJson;
use crate::api::handlers::batch_size;
use crate::backend::traits::ImageModel;
use crate::error::{AppError, Result};
use crate::gallery::model::GeneratedImage;
use crate::generation::ImageOutcome;
use crate::prompt::fields::filled_text;
use crate::prompt::GenerationParams;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateImagesRequest {
    #[serde(default)]
    pub selected_prompt: Option<String>,
    #[serde(default)]
    pub params: GenerationParams,
    #[serde(default)]
    pub num_images: Option<u32>,
}

#[derive(Serialize)]
pub struct GenerateImagesResponse {
    success: bool,
    workspace_id: String,
    total_images: usize,
    images: Vec<GeneratedImage>,
    outcomes: Vec<ImageOutcome>,
    prompt: String,
    params: GenerationParams,
    size: String,
    model: &'static str,
    message: String,
}

/// POST /api/generate-images
pub async fn generate_images(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<GenerateImagesRequest>,
) -> Result<(StatusCode, Json<GenerateImagesResponse>)> {
    let prompt = filled_text(&request.selected_prompt)
        .ok_or_else(|| AppError::InvalidRequest("selected_prompt is required".to_string()))?
        .to_string();

    let count = batch_size(request.num_images, state.settings.generation.max_images, "num_images")?;
    let model = ImageModel::from_param(request.params.image_model.as_deref());

    let report = state
        .dispatcher
        .generate(&prompt, &request.params, count, model)
        .await?;

    let response = GenerateImagesResponse {
        success: true,
        workspace_id: state.settings.workspace.id.clone(),
        total_images: report.total,
        message: format!("Generated {} images successfully", report.total),
        images: report.images,
        outcomes: report.outcomes,
        prompt,
        params: request.params,
        size: report.size,
        model: model.as_str(),
    };

    Ok((StatusCode::CREATED, Json(response)))
}
