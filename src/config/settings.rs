//! Application settings and configuration management

use crate::error::{AppError, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub workspace: WorkspaceConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Browser origins allowed by CORS; empty means any origin
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Uploaded reference images arrive base64-encoded in JSON bodies
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:5173".to_string(),
        "http://localhost:5174".to_string(),
        "http://localhost:3000".to_string(),
        "http://localhost:5000".to_string(),
    ]
}

fn default_request_timeout() -> u64 {
    600
}

fn default_body_limit() -> usize {
    25 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
            request_timeout_secs: default_request_timeout(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

/// Workspace scoping for gallery queries
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorkspaceConfig {
    #[serde(default = "default_workspace_id")]
    pub id: String,
}

fn default_workspace_id() -> String {
    "default".to_string()
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            id: default_workspace_id(),
        }
    }
}

/// Image storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_path")]
    pub local_dir: String,
    /// Public base URL of this server, used to build local image URLs
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    #[serde(default = "default_download_timeout")]
    pub download_timeout_secs: u64,
    #[serde(default)]
    pub azure: AzureStorageConfig,
}

fn default_storage_path() -> String {
    "./generated_images".to_string()
}

fn default_public_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_download_timeout() -> u64 {
    30
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            local_dir: default_storage_path(),
            public_base_url: default_public_base_url(),
            download_timeout_secs: default_download_timeout(),
            azure: AzureStorageConfig::default(),
        }
    }
}

/// Azure Blob Storage configuration (remote tier)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AzureStorageConfig {
    #[serde(default)]
    pub connection_string: Option<String>,
    #[serde(default)]
    pub account_name: Option<String>,
    #[serde(default)]
    pub account_key: Option<String>,
    #[serde(default = "default_container")]
    pub container: String,
    #[serde(default = "default_sas_expiry_years")]
    pub sas_expiry_years: u32,
    #[serde(default = "default_azure_timeout")]
    pub timeout_secs: u64,
}

fn default_container() -> String {
    "generated-images".to_string()
}

fn default_sas_expiry_years() -> u32 {
    10
}

fn default_azure_timeout() -> u64 {
    30
}

impl Default for AzureStorageConfig {
    fn default() -> Self {
        Self {
            connection_string: None,
            account_name: None,
            account_key: None,
            container: default_container(),
            sas_expiry_years: default_sas_expiry_years(),
            timeout_secs: default_azure_timeout(),
        }
    }
}

/// Document store configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Directory for collection snapshots; collections stay in memory only when unset
    #[serde(default)]
    pub data_dir: Option<String>,
}

/// Remote AI providers
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub claude: ClaudeConfig,
    #[serde(default)]
    pub flux: FluxConfig,
    #[serde(default)]
    pub gemini: GeminiConfig,
}

/// Text and vision provider
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClaudeConfig {
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_claude_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_claude_model() -> String {
    "claude-opus-4-1".to_string()
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_timeout() -> u64 {
    60
}

impl Default for ClaudeConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            model: default_claude_model(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Free image provider (custom sizes)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FluxConfig {
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for FluxConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            timeout_secs: default_timeout(),
        }
    }
}

/// Premium image provider (square only)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeminiConfig {
    #[serde(default = "default_gemini_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_gemini_model")]
    pub model: String,
    #[serde(default = "default_gemini_timeout")]
    pub timeout_secs: u64,
}

fn default_gemini_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash-image".to_string()
}

fn default_gemini_timeout() -> u64 {
    120
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_gemini_endpoint(),
            api_key: None,
            model: default_gemini_model(),
            timeout_secs: default_gemini_timeout(),
        }
    }
}

/// Generation pipeline limits
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerationConfig {
    /// Pause between successive image requests
    #[serde(default = "default_request_gap")]
    pub request_gap_ms: u64,
    #[serde(default = "default_max_items")]
    pub max_images: u32,
    #[serde(default = "default_max_items")]
    pub max_variations: u32,
}

fn default_request_gap() -> u64 {
    2000
}

fn default_max_items() -> u32 {
    10
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            request_gap_ms: default_request_gap(),
            max_images: default_max_items(),
            max_variations: default_max_items(),
        }
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_rps")]
    pub requests_per_second: u32,
    #[serde(default = "default_burst")]
    pub burst_size: u32,
}

fn default_true() -> bool {
    true
}

fn default_rps() -> u32 {
    20
}

fn default_burst() -> u32 {
    40
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            requests_per_second: default_rps(),
            burst_size: default_burst(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Settings {
    /// Load settings from configuration files and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/default.toml")
    }

    /// Load settings from a specific configuration file path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", i64::from(default_port()))?
            .set_default("workspace.id", default_workspace_id())?
            .set_default("rate_limit.enabled", true)?
            .add_source(
                File::with_name(path.as_ref().to_str().unwrap_or("config/default"))
                    .required(false),
            )
            // Override with environment variables (prefixed with AD_STUDIO__)
            .add_source(
                Environment::with_prefix("AD_STUDIO")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins"),
            )
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(invalid("Server port cannot be 0"));
        }
        if self.workspace.id.trim().is_empty() {
            return Err(invalid("Workspace id cannot be empty"));
        }
        if self.generation.max_images == 0 || self.generation.max_variations == 0 {
            return Err(invalid("Generation limits must be at least 1"));
        }
        if !["json", "pretty"].contains(&self.logging.format.as_str()) {
            return Err(invalid(&format!(
                "Invalid log format '{}'. Must be 'json' or 'pretty'",
                self.logging.format
            )));
        }
        Ok(())
    }
}

fn invalid(message: &str) -> AppError {
    AppError::Config(config::ConfigError::Message(message.to_string()))
}
