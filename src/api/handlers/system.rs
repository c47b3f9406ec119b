//! Config catalogs, health and workspace stats

use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::backend::traits::ImageModel;
use crate::error::Result;
use crate::gallery::model::WorkspaceStats;
use crate::prompt::catalog::ConfigOptions;
use crate::storage::StorageKind;
use crate::AppState;

#[derive(Serialize)]
pub struct ConfigResponse {
    success: bool,
    #[serde(flatten)]
    options: ConfigOptions,
}

/// GET /api/config
pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<ConfigResponse> {
    Json(ConfigResponse {
        success: true,
        options: ConfigOptions::new(state.settings.workspace.id.clone()),
    })
}

/// GET /api/health
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "success": true,
        "status": "healthy",
        "database": if state.database_persistent { "persistent" } else { "memory" },
        "storage": {
            "primary": state.storage.primary_kind().map(|k| k.as_str()),
            "azure": state.storage.is_available(StorageKind::Azure),
            "local": state.storage.is_available(StorageKind::Local),
        },
        "providers": {
            "text": state.enhancer.is_remote(),
            "vision": state.assistant.has_vision(),
            "free": state.dispatcher.has_provider(ImageModel::Free),
            "paid": state.dispatcher.has_provider(ImageModel::Paid),
        },
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

#[derive(Serialize)]
pub struct StatsResponse {
    success: bool,
    #[serde(flatten)]
    stats: WorkspaceStats,
}

/// GET /api/stats
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Result<Json<StatsResponse>> {
    let stats = state.ads.workspace_stats(&state.settings.workspace.id).await?;
    Ok(Json(StatsResponse {
        success: true,
        stats,
    }))
}
