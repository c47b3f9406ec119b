//! Functional tests for image dispatch against mocked providers and storage

use ad_studio::backend::traits::{ImageModel, ImageProvider};
use ad_studio::backend::{FluxClient, GeminiClient};
use ad_studio::config::{AzureStorageConfig, FluxConfig, GeminiConfig};
use ad_studio::gallery::ImageSource;
use ad_studio::generation::{ImageDispatcher, OutcomeStatus};
use ad_studio::media::base64;
use ad_studio::prompt::GenerationParams;
use ad_studio::storage::azure::AzureCredentials;
use ad_studio::storage::{AzureBlobStore, FallbackStore, LocalStore, ObjectStore, StorageKind};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::tempdir;
use wiremock::matchers::{header, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PNG_BYTES: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 1, 2, 3];
const FLUX_PATH: &str = "/openai/deployments/flux/images/generations";

fn flux(server: &MockServer) -> Arc<dyn ImageProvider> {
    let config = FluxConfig {
        endpoint: Some(format!("{}{}", server.uri(), FLUX_PATH)),
        api_key: Some("flux-key".to_string()),
        timeout_secs: 5,
    };
    Arc::new(FluxClient::from_config(&config).unwrap())
}

fn local_storage(dir: &Path) -> Arc<FallbackStore> {
    let local: Arc<dyn ObjectStore> = Arc::new(LocalStore::new(dir, "http://localhost:5000"));
    Arc::new(FallbackStore::new(vec![local], Duration::from_secs(5)).unwrap())
}

fn story_params() -> GenerationParams {
    serde_json::from_value(json!({
        "aspect_ratio": "instagram_story",
        "category": "Real Estate",
        "image_model": "free"
    }))
    .unwrap()
}

#[tokio::test]
async fn test_free_tier_generates_sequentially_with_gap() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(FLUX_PATH))
        .and(header("api-key", "flux-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "b64_json": base64::encode(PNG_BYTES) }]
        })))
        .expect(3)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let dispatcher = ImageDispatcher::new(
        None,
        Some(flux(&server)),
        local_storage(dir.path()),
        "acme",
        Duration::from_secs(2),
    );

    let started = Instant::now();
    let report = dispatcher
        .generate("A poster", &story_params(), 3, ImageModel::Free)
        .await
        .unwrap();

    assert!(started.elapsed() >= Duration::from_secs(4));
    assert_eq!(report.total, 3);
    assert_eq!(report.size, "1024x1792");
    assert_eq!(report.images.len(), 3);

    for (index, image) in report.images.iter().enumerate() {
        assert_eq!(report.outcomes[index].index, index);
        assert!(image.filename.starts_with("acme_Real_Estate_"));
        assert_eq!(image.source, ImageSource::Base64);
        assert_eq!(image.storage, Some(StorageKind::Local));
        assert_eq!(image.url, format!("http://localhost:5000/images/{}", image.filename));
        assert_eq!(std::fs::read(dir.path().join(&image.filename)).unwrap(), PNG_BYTES);
    }

    for request in server.received_requests().await.unwrap() {
        let body: Value = serde_json::from_slice(&request.body).unwrap();
        assert_eq!(body["size"], "1024x1792");
        assert_eq!(body["n"], 1);
        assert_eq!(body["prompt"], "A poster");
    }
}

#[tokio::test]
async fn test_remote_url_is_downloaded_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(FLUX_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "url": format!("{}/tmp/image.png", server.uri()) }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tmp/image.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(PNG_BYTES))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let dispatcher = ImageDispatcher::new(None, Some(flux(&server)), local_storage(dir.path()), "acme", Duration::ZERO);

    let report = dispatcher
        .generate("A poster", &GenerationParams::default(), 1, ImageModel::Free)
        .await
        .unwrap();

    assert_eq!(report.total, 1);
    assert_eq!(report.size, "1024x1024");
    assert_eq!(report.images[0].source, ImageSource::Url);
    assert!(report.images[0].filename.starts_with("acme_general_"));
}

#[tokio::test]
async fn test_provider_errors_become_failed_outcomes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(FLUX_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("deployment overloaded"))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let dispatcher = ImageDispatcher::new(None, Some(flux(&server)), local_storage(dir.path()), "acme", Duration::ZERO);

    let report = dispatcher
        .generate("A poster", &story_params(), 2, ImageModel::Free)
        .await
        .unwrap();

    assert_eq!(report.total, 0);
    assert!(report.images.is_empty());
    assert_eq!(report.outcomes.len(), 2);
    assert!(report
        .outcomes
        .iter()
        .all(|o| matches!(o.status, OutcomeStatus::Failed { .. })));
}

#[tokio::test]
async fn test_premium_tier_without_image_part() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-test:generateContent"))
        .and(header("x-goog-api-key", "gemini-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "I cannot draw that" }] } }]
        })))
        .mount(&server)
        .await;

    let gemini = GeminiClient::from_config(&GeminiConfig {
        endpoint: server.uri(),
        api_key: Some("gemini-key".to_string()),
        model: "gemini-test".to_string(),
        timeout_secs: 5,
    })
    .unwrap();

    let dir = tempdir().unwrap();
    let dispatcher = ImageDispatcher::new(
        Some(Arc::new(gemini)),
        None,
        local_storage(dir.path()),
        "acme",
        Duration::ZERO,
    );

    let report = dispatcher
        .generate("A poster", &GenerationParams::default(), 1, ImageModel::Paid)
        .await
        .unwrap();

    assert_eq!(report.total, 0);
    match &report.outcomes[0].status {
        OutcomeStatus::Failed { reason } => assert!(reason.contains("Gemini")),
        other => panic!("expected failure, got {:?}", other),
    }

    assert!(dispatcher
        .generate("A poster", &GenerationParams::default(), 1, ImageModel::Free)
        .await
        .is_err());
}

#[tokio::test]
async fn test_blob_failure_falls_back_to_local() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/generated-images"))
        .and(query_param("restype", "container"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path_regex(r"^/generated-images/.+\.png$"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let config = AzureStorageConfig {
        container: "generated-images".to_string(),
        timeout_secs: 5,
        ..Default::default()
    };
    let credentials =
        AzureCredentials::new("acct", "c2VjcmV0LWtleS1mb3ItdGVzdHM=", &server.uri()).unwrap();
    let azure = AzureBlobStore::new(credentials, &config).unwrap();
    azure.connect().await.unwrap();
    assert!(azure.is_available());

    let dir = tempdir().unwrap();
    let tiers: Vec<Arc<dyn ObjectStore>> = vec![
        Arc::new(azure),
        Arc::new(LocalStore::new(dir.path(), "http://localhost:5000")),
    ];
    let storage = FallbackStore::new(tiers, Duration::from_secs(5)).unwrap();
    assert_eq!(storage.primary_kind(), Some(StorageKind::Azure));

    let stored = storage.store_bytes(PNG_BYTES, "acme", "Tech").await.unwrap();
    assert_eq!(stored.storage, StorageKind::Local);
    assert!(dir.path().join(&stored.filename).exists());
}
