//! Anthropic Messages API client, used for text completion and image reading

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::backend::traits::{TextGenerator, VisionAnalyzer};
use crate::config::ClaudeConfig;
use crate::error::{AppError, Result};
use crate::media::EncodedImage;

const DEFAULT_ENDPOINT: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: Vec<ContentBlock<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ContentBlock<'a> {
    Text { text: &'a str },
    Image { source: ImageSource<'a> },
}

#[derive(Debug, Serialize)]
struct ImageSource<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    media_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ResponseBlock>,
}

#[derive(Debug, Deserialize)]
struct ResponseBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// Client for a Claude deployment
pub struct ClaudeClient {
    client: Client,
    url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl ClaudeClient {
    /// Build from config; fails with `ProviderNotConfigured` when no key is set
    pub fn from_config(config: &ClaudeConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AppError::ProviderNotConfigured("Claude".to_string()))?;

        let endpoint = config
            .endpoint
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .unwrap_or(DEFAULT_ENDPOINT);

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: format!("{}/v1/messages", endpoint.trim_end_matches('/')),
            api_key,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        })
    }

    async fn send(&self, content: Vec<ContentBlock<'_>>, temperature: Option<f32>) -> Result<String> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            temperature,
            messages: vec![Message {
                role: "user",
                content,
            }],
        };

        debug!(model = %self.model, "Sending messages request");

        let response = self
            .client
            .post(&self.url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Provider(format!("Claude returned {}: {}", status, body)));
        }

        let parsed: MessagesResponse = response.json().await?;
        parsed
            .content
            .into_iter()
            .find(|block| block.kind == "text")
            .and_then(|block| block.text)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| AppError::Provider("Claude returned no text".to_string()))
    }
}

#[async_trait]
impl TextGenerator for ClaudeClient {
    fn name(&self) -> &str {
        "claude"
    }

    async fn complete(&self, prompt: &str, temperature: f32) -> Result<String> {
        self.send(vec![ContentBlock::Text { text: prompt }], Some(temperature))
            .await
    }
}

#[async_trait]
impl VisionAnalyzer for ClaudeClient {
    fn name(&self) -> &str {
        "claude"
    }

    async fn analyze(&self, image: &EncodedImage, instruction: &str) -> Result<String> {
        let content = vec![
            ContentBlock::Image {
                source: ImageSource {
                    kind: "base64",
                    media_type: image.media_type,
                    data: &image.data,
                },
            },
            ContentBlock::Text { text: instruction },
        ];
        self.send(content, None).await
    }
}
