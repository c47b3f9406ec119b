//! Reference-image analysis and AI autofill

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::api::extract::ApiJson;
use crate::error::{AppError, Result};
use crate::prompt::fields::filled_text;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeImageRequest {
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Serialize)]
pub struct AnalyzeImageResponse {
    success: bool,
    visual_description: String,
    extracted_fields: Map<String, Value>,
}

/// POST /api/analyze-image
pub async fn analyze_image(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<AnalyzeImageRequest>,
) -> Result<Json<AnalyzeImageResponse>> {
    let image = filled_text(&request.image)
        .ok_or_else(|| AppError::InvalidRequest("Image data is required".to_string()))?;

    let fields = state.assistant.extract_fields(image).await?;
    let visual_description = fields
        .get("visual_description")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Ok(Json(AnalyzeImageResponse {
        success: true,
        visual_description,
        extracted_fields: fields,
    }))
}

#[derive(Debug, Deserialize)]
pub struct AutofillRequest {
    #[serde(default)]
    pub product_description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub brand_name: Option<String>,
}

#[derive(Serialize)]
pub struct AutofillResponse {
    success: bool,
    data: Map<String, Value>,
}

/// POST /api/autofill-fields
pub async fn autofill_fields(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<AutofillRequest>,
) -> Result<Json<AutofillResponse>> {
    let description = filled_text(&request.product_description)
        .ok_or_else(|| AppError::InvalidRequest("Product description is required".to_string()))?;

    let data = state
        .assistant
        .autofill_fields(
            description,
            filled_text(&request.category),
            filled_text(&request.brand_name),
        )
        .await?;

    Ok(Json(AutofillResponse { success: true, data }))
}
