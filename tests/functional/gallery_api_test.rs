//! Functional tests for the HTTP API: gallery lifecycle, validation and users

use ad_studio::{api::create_router, config::Settings, AppState};
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

async fn create_test_app() -> (Router, TempDir) {
    let dir = tempfile::tempdir().unwrap();

    let mut settings = Settings::default();
    settings.workspace.id = "acme".to_string();
    settings.storage.local_dir = dir.path().to_string_lossy().into_owned();
    settings.database.data_dir = None;
    settings.rate_limit.enabled = false;

    let state = AppState::from_settings(settings).await.unwrap();
    (create_router(Arc::new(state)), dir)
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn timestamp(value: &Value) -> DateTime<Utc> {
    serde_json::from_value(value.clone()).unwrap()
}

fn image(name: &str) -> Value {
    json!({
        "filename": name,
        "url": format!("http://localhost:5000/images/{}", name),
        "type": "base64",
        "storage": "local"
    })
}

#[tokio::test]
async fn test_ad_lifecycle() {
    let (app, dir) = create_test_app().await;
    std::fs::write(dir.path().join("acme_Tech_00000001.png"), b"one").unwrap();
    std::fs::write(dir.path().join("acme_Tech_00000002.png"), b"two").unwrap();

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/save-to-gallery",
        Some(json!({
            "prompt": "A poster",
            "params": { "aspect_ratio": "instagram_post", "category": "Tech" },
            "images": [image("acme_Tech_00000001.png"), image("acme_Tech_00000002.png")]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Saved 2 images to gallery");
    let ad_id = body["ad_id"].as_str().unwrap().to_string();

    let (status, body) = call(&app, Method::GET, "/api/ads", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["count"], 1);
    assert_eq!(body["ads"][0]["_id"], ad_id.as_str());
    assert_eq!(body["ads"][0]["size"], "1024x1024");
    assert_eq!(body["ads"][0]["workspace_id"], "acme");

    let (_, body) = call(&app, Method::GET, "/api/ads?aspect_ratio=pinterest", None).await;
    assert_eq!(body["total"], 0);

    let (status, body) = call(
        &app,
        Method::PUT,
        &format!("/api/ads/{}", ad_id),
        Some(json!({ "tags": ["summer"], "custom_note": "hero" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Ad updated successfully");
    assert_eq!(body["ad"]["tags"][0], "summer");
    let created_at = timestamp(&body["ad"]["created_at"]);

    let (status, body) = call(
        &app,
        Method::DELETE,
        &format!("/api/ads/{}/images/acme_Tech_00000001.png", ad_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["remaining_images"], 1);
    assert!(!dir.path().join("acme_Tech_00000001.png").exists());

    let (status, body) = call(&app, Method::GET, &format!("/api/ads/{}", ad_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ad"]["images"].as_array().unwrap().len(), 1);
    assert!(timestamp(&body["ad"]["updated_at"]) > created_at);

    let (status, body) = call(&app, Method::DELETE, &format!("/api/ads/{}", ad_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted_files"], 1);

    let (status, body) = call(&app, Method::GET, &format!("/api/ads/{}", ad_id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Ad not found");
}

async fn save_ad(app: &Router, filename: &str) -> String {
    let (status, body) = call(
        app,
        Method::POST,
        "/api/save-to-gallery",
        Some(json!({ "prompt": "A poster", "images": [image(filename)] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["ad_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_delete_image_only_touches_own_images() {
    let (app, dir) = create_test_app().await;
    std::fs::write(dir.path().join("acme_A_00000001.png"), b"a").unwrap();
    std::fs::write(dir.path().join("acme_B_00000002.png"), b"b").unwrap();

    let first = save_ad(&app, "acme_A_00000001.png").await;
    let second = save_ad(&app, "acme_B_00000002.png").await;
    let (_, before) = call(&app, Method::GET, &format!("/api/ads/{}", first), None).await;

    let (status, body) = call(
        &app,
        Method::DELETE,
        &format!("/api/ads/{}/images/acme_B_00000002.png", first),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Image not found in ad");

    assert!(dir.path().join("acme_B_00000002.png").exists());
    assert!(dir.path().join("acme_A_00000001.png").exists());

    let (_, after) = call(&app, Method::GET, &format!("/api/ads/{}", first), None).await;
    assert_eq!(after["ad"]["updated_at"], before["ad"]["updated_at"]);
    assert_eq!(after["ad"]["images"].as_array().unwrap().len(), 1);

    let (_, other) = call(&app, Method::GET, &format!("/api/ads/{}", second), None).await;
    assert_eq!(other["ad"]["images"][0]["filename"], "acme_B_00000002.png");
}

#[tokio::test]
async fn test_save_requires_images() {
    let (app, _dir) = create_test_app().await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/save-to-gallery",
        Some(json!({ "prompt": "A poster", "images": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No images provided");
}

#[tokio::test]
async fn test_generate_prompts_validation_and_templates() {
    let (app, _dir) = create_test_app().await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/generate-prompts",
        Some(json!({ "params": { "headline": "Hi" } })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "aspect_ratio is required");

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/generate-prompts",
        Some(json!({ "params": { "aspect_ratio": "square" } })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid aspect_ratio"));

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/generate-prompts",
        Some(json!({ "params": { "aspect_ratio": "instagram_post", "headline": "Luxury Living" } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_variations"], 3);
    let variations = body["variations"].as_array().unwrap();
    assert_eq!(variations[2]["id"], 3);
    for variation in variations {
        let prompt = variation["prompt"].as_str().unwrap();
        assert!(prompt.contains("Main Headline (large, prominent): 'Luxury Living'"));
        let rating = variation["rating"].as_u64().unwrap();
        assert!((3..=5).contains(&rating));
    }

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/generate-prompts",
        Some(json!({ "params": { "aspect_ratio": "instagram_post" }, "num_variations": 11 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_generate_images_requirements() {
    let (app, _dir) = create_test_app().await;

    let (status, body) = call(&app, Method::POST, "/api/generate-images", Some(json!({ "params": {} }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "selected_prompt is required");

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/generate-images",
        Some(json!({ "selected_prompt": "A poster", "params": { "image_model": "paid" } })),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "provider_not_configured");
}

#[tokio::test]
async fn test_malformed_json_uses_error_envelope() {
    let (app, _dir) = create_test_app().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/autofill-fields")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (status, body) = call(&app, Method::POST, "/api/analyze-image", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Image data is required");
}

#[tokio::test]
async fn test_users_and_subscription() {
    let (app, _dir) = create_test_app().await;

    let (status, body) = call(&app, Method::GET, "/api/user-status?user_id=u1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_paid"], false);
    assert_eq!(body["model"], "Azure FLUX");

    let (status, body) = call(
        &app,
        Method::PUT,
        "/api/users/subscription",
        Some(json!({ "user_id": "u1", "is_paid": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model"], "Gemini 2.5 Flash Image");
    assert_eq!(body["message"], "User subscription updated to paid");

    let (status, _) = call(&app, Method::PUT, "/api/users/subscription", Some(json!({ "is_paid": true }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(&app, Method::POST, "/api/users", Some(json!({ "user_id": "u2", "email": "a@b.c" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = call(&app, Method::POST, "/api/users", Some(json!({ "user_id": "u2" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "User already exists");
}

#[tokio::test]
async fn test_config_health_stats_and_static_images() {
    let (app, dir) = create_test_app().await;
    std::fs::write(dir.path().join("acme_general_0a0b0c0d.png"), b"png").unwrap();

    let (status, body) = call(&app, Method::GET, "/api/config", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["workspace_id"], "acme");
    assert!(body["aspect_ratios"]["instagram_story"].is_string());

    let (status, body) = call(&app, Method::GET, "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["storage"]["primary"], "local");
    assert_eq!(body["providers"]["free"], false);
    assert_eq!(body["database"], "memory");

    let (status, body) = call(&app, Method::GET, "/api/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_ads"], 0);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/images/acme_general_0a0b0c0d.png")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
