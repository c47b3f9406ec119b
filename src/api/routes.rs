//! Router assembly

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::warn;

use crate::api::handlers::{assist, gallery, images, prompts, system, users};
use crate::config::ServerConfig;
use crate::middleware::RateLimitLayer;
use crate::AppState;

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any);

    if server.cors_origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = server
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}

/// Build the full HTTP surface: JSON API under `/api`, local images under `/images`
pub fn create_router(state: Arc<AppState>) -> Router {
    let settings = &state.settings;

    let api = Router::new()
        .route("/config", get(system::get_config))
        .route("/health", get(system::health_check))
        .route("/stats", get(system::get_stats))
        .route("/analyze-image", post(assist::analyze_image))
        .route("/autofill-fields", post(assist::autofill_fields))
        .route("/generate-prompts", post(prompts::generate_prompts))
        .route("/generate-images", post(images::generate_images))
        .route("/save-to-gallery", post(gallery::save_to_gallery))
        .route("/ads", get(gallery::list_ads))
        .route(
            "/ads/:id",
            get(gallery::get_ad).put(gallery::update_ad).delete(gallery::delete_ad),
        )
        .route("/ads/:id/images/:filename", delete(gallery::delete_image))
        .route("/delete-all-ads", delete(gallery::delete_all_ads))
        .route("/user-status", get(users::user_status))
        .route("/users", post(users::create_user))
        .route("/users/subscription", put(users::update_subscription));

    let mut router = Router::new()
        .nest("/api", api)
        .nest_service("/images", ServeDir::new(&settings.storage.local_dir))
        .layer(DefaultBodyLimit::max(settings.server.body_limit_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            settings.server.request_timeout_secs,
        )));

    if settings.rate_limit.enabled {
        router = router.layer(RateLimitLayer::from_config(&settings.rate_limit));
    }

    router
        .layer(cors_layer(&settings.server))
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone())
}
