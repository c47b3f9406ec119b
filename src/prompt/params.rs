//! User-supplied generation parameters

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::prompt::fields::{filled_text, Filled};

/// Feature bullets arrive either as a list or as pre-formatted text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureList {
    Items(Vec<Option<String>>),
    Text(String),
}

impl FeatureList {
    /// Filled entries, trimmed
    pub fn items(&self) -> Vec<&str> {
        match self {
            FeatureList::Items(items) => items
                .iter()
                .filter_map(filled_text)
                .collect(),
            FeatureList::Text(text) => {
                let text = text.trim();
                if text.is_empty() {
                    Vec::new()
                } else {
                    vec![text]
                }
            }
        }
    }

    /// Bullet block used by the base prompt
    pub fn as_bullets(&self) -> String {
        match self {
            FeatureList::Items(_) => self
                .items()
                .iter()
                .map(|item| format!("• {}", item))
                .collect::<Vec<_>>()
                .join("\n"),
            FeatureList::Text(text) => text.trim().to_string(),
        }
    }

    /// Single-line form used in text overlay instructions
    pub fn inline(&self) -> String {
        self.items().join(", ")
    }
}

impl Filled for FeatureList {
    fn is_filled(&self) -> bool {
        match self {
            FeatureList::Items(items) => items.is_filled(),
            FeatureList::Text(text) => text.is_filled(),
        }
    }
}

/// Optional ad-copy fields plus generation settings.
///
/// Keys the backend does not know about are kept in `extra` so that the
/// snapshot saved with an ad matches what the client sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subheadline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_copy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offer_label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_list: Option<FeatureList>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_theme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
    /// `free` or `paid`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_variations: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_uploaded_image: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_image: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GenerationParams {
    /// Category used in stored filenames
    pub fn storage_category(&self) -> &str {
        filled_text(&self.category).unwrap_or("general")
    }

    /// Base64 reference image when the client asked to build from it
    pub fn reference_image(&self) -> Option<&str> {
        if self.use_uploaded_image.unwrap_or(false) {
            filled_text(&self.uploaded_image)
        } else {
            None
        }
    }
}
