//! FLUX image deployment speaking the OpenAI-style images envelope (free tier)

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::backend::traits::{ImageProvider, ProviderImage};
use crate::config::FluxConfig;
use crate::error::{AppError, Result};
use crate::generation::size::ImageSize;
use crate::media::base64;

#[derive(Debug, Serialize)]
struct FluxRequest<'a> {
    prompt: &'a str,
    n: u32,
    size: String,
}

#[derive(Debug, Deserialize)]
struct FluxResponse {
    #[serde(default)]
    data: Vec<FluxImageData>,
}

#[derive(Debug, Deserialize)]
struct FluxImageData {
    #[serde(default)]
    b64_json: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

/// Client for the free-tier image deployment
pub struct FluxClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl FluxClient {
    pub fn from_config(config: &FluxConfig) -> Result<Self> {
        let (endpoint, api_key) = match (config.endpoint.as_deref(), config.api_key.as_deref()) {
            (Some(endpoint), Some(key)) if !endpoint.trim().is_empty() && !key.trim().is_empty() => {
                (endpoint.to_string(), key.to_string())
            }
            _ => return Err(AppError::ProviderNotConfigured("FLUX".to_string())),
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }
}

#[async_trait]
impl ImageProvider for FluxClient {
    fn name(&self) -> &str {
        "flux"
    }

    fn supports_size(&self) -> bool {
        true
    }

    async fn generate(&self, prompt: &str, size: ImageSize) -> Result<ProviderImage> {
        let request = FluxRequest {
            prompt,
            n: 1,
            size: size.to_string(),
        };

        debug!(size = %size, "Sending FLUX generate request");

        let response = self
            .client
            .post(&self.endpoint)
            .header("api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Provider(format!("FLUX returned {}: {}", status, body)));
        }

        let parsed: FluxResponse = response.json().await?;
        let first = parsed
            .data
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NoImageData("FLUX".to_string()))?;

        match (first.b64_json, first.url) {
            (Some(b64), _) => Ok(ProviderImage::Inline(base64::decode(&b64)?)),
            (None, Some(url)) => Ok(ProviderImage::Remote(url)),
            (None, None) => Err(AppError::NoImageData("FLUX".to_string())),
        }
    }
}
