//! Gemini image model over the generateContent REST API (paid tier)

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::backend::traits::{ImageProvider, ProviderImage};
use crate::config::GeminiConfig;
use crate::error::{AppError, Result};
use crate::generation::size::ImageSize;
use crate::media::base64;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<&'static str>,
}

/// Subset of the generateContent response that can carry image data
#[derive(Debug, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Part {
    #[serde(default, alias = "inline_data", rename = "inlineData")]
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Default, Deserialize)]
pub struct InlineData {
    #[serde(default)]
    pub data: String,
}

/// Outcome of scanning a response for an image part
#[derive(Debug, Clone, PartialEq)]
pub enum InlineImage {
    Found(Vec<u8>),
    NotFound,
}

impl GenerateContentResponse {
    /// First decodable inline image across candidates and parts
    pub fn inline_image(&self) -> InlineImage {
        let parts = self
            .candidates
            .iter()
            .filter_map(|candidate| candidate.content.as_ref())
            .flat_map(|content| content.parts.iter());

        for inline in parts.filter_map(|part| part.inline_data.as_ref()) {
            if inline.data.is_empty() {
                continue;
            }
            match base64::decode(&inline.data) {
                Ok(bytes) => return InlineImage::Found(bytes),
                Err(e) => warn!(error = %e, "Skipping undecodable inline image part"),
            }
        }

        InlineImage::NotFound
    }
}

/// Client for the paid-tier image model
pub struct GeminiClient {
    client: Client,
    url: String,
    api_key: String,
}

impl GeminiClient {
    pub fn from_config(config: &GeminiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AppError::ProviderNotConfigured("Gemini".to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: format!(
                "{}/models/{}:generateContent",
                config.endpoint.trim_end_matches('/'),
                config.model
            ),
            api_key,
        })
    }
}

#[async_trait]
impl ImageProvider for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    fn supports_size(&self) -> bool {
        false
    }

    async fn generate(&self, prompt: &str, _size: ImageSize) -> Result<ProviderImage> {
        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["IMAGE", "TEXT"],
            },
        };

        debug!("Sending Gemini generateContent request");

        let response = self
            .client
            .post(&self.url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Provider(format!("Gemini returned {}: {}", status, body)));
        }

        let parsed: GenerateContentResponse = response.json().await?;
        match parsed.inline_image() {
            InlineImage::Found(bytes) => Ok(ProviderImage::Inline(bytes)),
            InlineImage::NotFound => Err(AppError::NoImageData("Gemini".to_string())),
        }
    }
}
