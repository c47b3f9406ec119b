//! Prompt variation generation

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::api::extract::ApiJson;
use crate::api::handlers::batch_size;
use crate::error::{AppError, Result};
use crate::generation::size::AspectRatio;
use crate::prompt::fields::filled_text;
use crate::prompt::reference::reference_variations;
use crate::prompt::{build_variations, compose, GenerationParams, PromptVariation};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct GeneratePromptsRequest {
    #[serde(default)]
    pub params: GenerationParams,
    #[serde(default)]
    pub num_variations: Option<u32>,
}

#[derive(Serialize)]
pub struct GeneratePromptsResponse {
    success: bool,
    total_variations: usize,
    variations: Vec<PromptVariation>,
    params: GenerationParams,
}

/// POST /api/generate-prompts
///
/// With a reference image the variations recreate its description plus any
/// text overrides; otherwise the composed base prompt is enhanced per persona.
pub async fn generate_prompts(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<GeneratePromptsRequest>,
) -> Result<Json<GeneratePromptsResponse>> {
    let params = request.params;

    let ratio = filled_text(&params.aspect_ratio)
        .ok_or_else(|| AppError::InvalidRequest("aspect_ratio is required".to_string()))?;
    ratio.parse::<AspectRatio>()?;

    let count = batch_size(
        request.num_variations.or(params.num_variations),
        state.settings.generation.max_variations,
        "num_variations",
    )?;

    let prompts = match params.reference_image() {
        Some(image) => {
            let description = state.assistant.describe_reference_image(image).await?;
            reference_variations(&description, &params, count)
        }
        None => {
            let base = compose(&params);
            state.enhancer.enhance_all(&base, count).await
        }
    };

    let variations = build_variations(prompts);
    info!(
        count = variations.len(),
        category = params.storage_category(),
        aspect_ratio = ratio,
        "Generated prompt variations"
    );

    Ok(Json(GeneratePromptsResponse {
        success: true,
        total_variations: variations.len(),
        variations,
        params,
    }))
}
