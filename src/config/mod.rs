//! Configuration loading

pub mod settings;

pub use settings::{
    AzureStorageConfig, ClaudeConfig, DatabaseConfig, FluxConfig, GeminiConfig,
    GenerationConfig, LoggingConfig, ProvidersConfig, RateLimitConfig, ServerConfig, Settings,
    StorageConfig, WorkspaceConfig,
};
