//! Reference-image reading and AI field suggestions

pub mod instructions;

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::{Arc, LazyLock};
use tracing::{debug, info};

use crate::backend::traits::{TextGenerator, VisionAnalyzer};
use crate::error::{AppError, Result};
use crate::media::EncodedImage;
use crate::prompt::fields::Filled;

static JSON_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[\s\S]*\}").expect("valid regex"));

const AUTOFILL_TEMPERATURE: f32 = 0.7;

/// Parse the outermost `{...}` block of a model reply
pub fn extract_json_object(reply: &str) -> Result<Map<String, Value>> {
    let candidate = JSON_OBJECT
        .find(reply)
        .map(|m| m.as_str())
        .unwrap_or(reply);

    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(AppError::Provider("Model reply is not a JSON object".to_string())),
        Err(e) => Err(AppError::Provider(format!("Model reply is not valid JSON: {}", e))),
    }
}

/// Vision and text helpers around the ad form
pub struct AdAssistant {
    text: Option<Arc<dyn TextGenerator>>,
    vision: Option<Arc<dyn VisionAnalyzer>>,
}

impl AdAssistant {
    pub fn new(text: Option<Arc<dyn TextGenerator>>, vision: Option<Arc<dyn VisionAnalyzer>>) -> Self {
        Self { text, vision }
    }

    fn vision(&self) -> Result<&Arc<dyn VisionAnalyzer>> {
        self.vision
            .as_ref()
            .ok_or_else(|| AppError::ProviderNotConfigured("Vision provider".to_string()))
    }

    fn text(&self) -> Result<&Arc<dyn TextGenerator>> {
        self.text
            .as_ref()
            .ok_or_else(|| AppError::ProviderNotConfigured("Text generator".to_string()))
    }

    pub fn has_vision(&self) -> bool {
        self.vision.is_some()
    }

    /// Exhaustive visual description of a reference image, ignoring its text
    pub async fn describe_reference_image(&self, image_b64: &str) -> Result<String> {
        let vision = self.vision()?;
        let image = EncodedImage::from_upload(image_b64)?;
        debug!(media_type = image.media_type, "Describing reference image");

        let description = vision
            .analyze(&image, instructions::DESCRIBE_REFERENCE)
            .await?
            .trim()
            .to_string();

        if description.is_empty() {
            return Err(AppError::Provider("Failed to analyze uploaded image".to_string()));
        }
        info!(length = description.chars().count(), "Reference image described");
        Ok(description)
    }

    /// Read the ad copy and a short scene description off an existing poster
    pub async fn extract_fields(&self, image_b64: &str) -> Result<Map<String, Value>> {
        let vision = self.vision()?;
        let image = EncodedImage::from_upload(image_b64)?;

        let reply = vision.analyze(&image, instructions::EXTRACT_FIELDS).await?;
        let fields = extract_json_object(&reply)?;

        info!(
            filled = fields.values().filter(|v| v.is_filled()).count(),
            "Extracted fields from image"
        );
        Ok(fields)
    }

    /// Suggest short copy for every form field from a product description
    pub async fn autofill_fields(
        &self,
        product_description: &str,
        category: Option<&str>,
        brand_name: Option<&str>,
    ) -> Result<Map<String, Value>> {
        let text = self.text()?;
        let prompt = instructions::autofill(product_description, category, brand_name);

        let reply = text.complete(&prompt, AUTOFILL_TEMPERATURE).await?;
        let fields = extract_json_object(&reply)?;
        info!(fields = fields.len(), "Autofill suggestions generated");
        Ok(fields)
    }
}
