//! Functional tests for rate limiting

use ad_studio::middleware::rate_limit::RateLimitLayer;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

fn create_test_app(rps: u32, burst: u32) -> Router {
    Router::new()
        .route("/api/ads", axum::routing::get(|| async { "OK" }))
        .route("/api/health", axum::routing::get(|| async { "healthy" }))
        .route("/images/:name", axum::routing::get(|| async { "png" }))
        .layer(RateLimitLayer::new(rps, burst))
}

async fn get(app: &Router, uri: &str) -> axum::response::Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_rate_limit_allows_within_limit() {
    let app = create_test_app(100, 100);

    let response = get(&app, "/api/ads").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_rate_limit_burst_capacity() {
    let app = create_test_app(1, 5);

    for _ in 0..5 {
        assert_eq!(get(&app, "/api/ads").await.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn test_rate_limit_exceeded_uses_error_envelope() {
    let app = create_test_app(1, 1);
    assert_eq!(get(&app, "/api/ads").await.status(), StatusCode::OK);

    let mut limited = None;
    for _ in 0..10 {
        let response = get(&app, "/api/ads").await;
        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            limited = Some(response);
            break;
        }
    }

    let response = limited.expect("Expected rate limiting to kick in");
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "rate_limit_exceeded");
}

#[tokio::test]
async fn test_health_and_images_bypass() {
    let app = create_test_app(1, 1);
    assert_eq!(get(&app, "/api/ads").await.status(), StatusCode::OK);

    for _ in 0..5 {
        assert_eq!(get(&app, "/api/health").await.status(), StatusCode::OK);
        assert_eq!(get(&app, "/images/a.png").await.status(), StatusCode::OK);
    }
    assert_eq!(get(&app, "/api/ads").await.status(), StatusCode::TOO_MANY_REQUESTS);
}
