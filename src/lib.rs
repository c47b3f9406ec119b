//! Ad Studio backend
//!
//! Turns structured ad copy (or a reference image) into AI-generated
//! advertising images, stores them with a remote/local fallback, and keeps
//! a gallery of saved ads per workspace.

pub mod api;
pub mod assistant;
pub mod backend;
pub mod config;
pub mod error;
pub mod gallery;
pub mod generation;
pub mod media;
pub mod middleware;
pub mod prompt;
pub mod storage;

pub use error::{AppError, Result};

use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use assistant::AdAssistant;
use backend::traits::{ImageProvider, TextGenerator, VisionAnalyzer};
use backend::{ClaudeClient, FluxClient, GeminiClient};
use config::Settings;
use gallery::{AdRepository, DocumentAdRepository, DocumentStore, DocumentUserRepository, UserRepository};
use generation::ImageDispatcher;
use prompt::PromptEnhancer;
use storage::{AzureBlobStore, FallbackStore, LocalStore, ObjectStore};
use storage::azure::AzureCredentials;

/// Application state shared across all handlers
pub struct AppState {
    pub settings: Settings,
    pub enhancer: PromptEnhancer,
    pub assistant: AdAssistant,
    pub dispatcher: ImageDispatcher,
    pub storage: Arc<FallbackStore>,
    pub ads: Arc<dyn AdRepository>,
    pub users: Arc<dyn UserRepository>,
    pub database_persistent: bool,
}

/// A provider that is simply not configured is skipped; any other error is fatal
fn optional_client<T>(label: &str, built: Result<T>) -> Result<Option<T>> {
    match built {
        Ok(client) => {
            info!(provider = label, "Provider configured");
            Ok(Some(client))
        }
        Err(AppError::ProviderNotConfigured(_)) => {
            warn!(provider = label, "Provider not configured, related features are disabled");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Remote tier first when configured, local directory always last
async fn build_storage(settings: &Settings) -> Result<FallbackStore> {
    let mut tiers: Vec<Arc<dyn ObjectStore>> = Vec::with_capacity(2);

    match AzureCredentials::from_config(&settings.storage.azure)? {
        Some(credentials) => {
            let azure = AzureBlobStore::new(credentials, &settings.storage.azure)?;
            if let Err(e) = azure.connect().await {
                warn!(error = %e, "Blob storage unavailable, images will be stored locally");
            }
            tiers.push(Arc::new(azure));
        }
        None => warn!("Blob storage not configured, images will be stored locally"),
    }

    let local = LocalStore::new(&settings.storage.local_dir, &settings.storage.public_base_url);
    local.ensure_storage_dir().await?;
    tiers.push(Arc::new(local));

    FallbackStore::new(
        tiers,
        Duration::from_secs(settings.storage.download_timeout_secs),
    )
}

impl AppState {
    /// Build every service once from configuration
    pub async fn from_settings(settings: Settings) -> Result<Self> {
        let providers = &settings.providers;

        let claude = optional_client("claude", ClaudeClient::from_config(&providers.claude))?
            .map(Arc::new);
        let text: Option<Arc<dyn TextGenerator>> =
            claude.clone().map(|c| c as Arc<dyn TextGenerator>);
        let vision: Option<Arc<dyn VisionAnalyzer>> = claude.map(|c| c as Arc<dyn VisionAnalyzer>);

        let free: Option<Arc<dyn ImageProvider>> =
            optional_client("flux", FluxClient::from_config(&providers.flux))?
                .map(|c| Arc::new(c) as Arc<dyn ImageProvider>);
        let premium: Option<Arc<dyn ImageProvider>> =
            optional_client("gemini", GeminiClient::from_config(&providers.gemini))?
                .map(|c| Arc::new(c) as Arc<dyn ImageProvider>);

        let storage = Arc::new(build_storage(&settings).await?);

        let store = match settings.database.data_dir.as_deref() {
            Some(dir) if !dir.trim().is_empty() => DocumentStore::persistent(dir),
            _ => {
                warn!("No database.data_dir set, gallery data lives in memory only");
                DocumentStore::in_memory()
            }
        };
        let ads: Arc<dyn AdRepository> = Arc::new(DocumentAdRepository::open(&store).await?);
        let users: Arc<dyn UserRepository> = Arc::new(DocumentUserRepository::open(&store).await?);

        let dispatcher = ImageDispatcher::new(
            premium,
            free,
            storage.clone(),
            settings.workspace.id.clone(),
            Duration::from_millis(settings.generation.request_gap_ms),
        );

        Ok(Self {
            enhancer: PromptEnhancer::new(text.clone()),
            assistant: AdAssistant::new(text, vision),
            dispatcher,
            storage,
            ads,
            users,
            database_persistent: store.is_persistent(),
            settings,
        })
    }
}
