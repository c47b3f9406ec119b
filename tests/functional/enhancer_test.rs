//! Functional tests for prompt enhancement and the reference-image assistant

use ad_studio::assistant::AdAssistant;
use ad_studio::backend::traits::{TextGenerator, VisionAnalyzer};
use ad_studio::backend::ClaudeClient;
use ad_studio::config::ClaudeConfig;
use ad_studio::media::base64;
use ad_studio::prompt::enhancer::fallback_prompt;
use ad_studio::prompt::PromptEnhancer;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio_test::assert_ok;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PNG_HEADER: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

fn claude(server: &MockServer) -> Arc<ClaudeClient> {
    let config = ClaudeConfig {
        endpoint: Some(server.uri()),
        api_key: Some("test-key".to_string()),
        timeout_secs: 5,
        ..Default::default()
    };
    Arc::new(ClaudeClient::from_config(&config).unwrap())
}

fn text_reply(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "id": "msg_1",
        "type": "message",
        "role": "assistant",
        "content": [{ "type": "text", "text": text }]
    }))
}

#[tokio::test]
async fn test_remote_enhancement_with_rising_temperature() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "test-key"))
        .and(header("anthropic-version", "2023-06-01"))
        .respond_with(text_reply("  A vivid enhanced poster prompt  "))
        .expect(3)
        .mount(&server)
        .await;

    let enhancer = PromptEnhancer::new(Some(claude(&server) as Arc<dyn TextGenerator>));
    assert!(enhancer.is_remote());

    let prompts = enhancer.enhance_all("BASE", 3).await;
    assert_eq!(prompts, vec!["A vivid enhanced poster prompt".to_string(); 3]);

    let temperatures: Vec<f64> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| {
            let body: Value = serde_json::from_slice(&r.body).unwrap();
            body["temperature"].as_f64().unwrap()
        })
        .collect();
    for (i, expected) in [0.7, 0.8, 0.9].iter().enumerate() {
        assert!((temperatures[i] - expected).abs() < 1e-3);
    }
}

#[tokio::test]
async fn test_server_error_falls_back_to_template() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(500).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let enhancer = PromptEnhancer::new(Some(claude(&server) as Arc<dyn TextGenerator>));

    let prompt = enhancer.enhance("BASE", 1, 3).await;
    assert_eq!(prompt, fallback_prompt("BASE", 1));
    assert!(prompt.starts_with("well-dressed professional man"));
    assert!(prompt.ends_with(". BASE"));
}

#[tokio::test]
async fn test_extract_fields_from_poster() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(text_reply(
            "Here is the analysis:\n{\"visual_description\": \"A sneaker on a white floor.\", \"headline\": \"Run Free\", \"price\": \"\", \"features\": [\"Light\", \"Fast\"]}",
        ))
        .mount(&server)
        .await;

    let client = claude(&server);
    let assistant = AdAssistant::new(
        Some(client.clone() as Arc<dyn TextGenerator>),
        Some(client as Arc<dyn VisionAnalyzer>),
    );

    let upload = format!("data:image/png;base64,{}", base64::encode(PNG_HEADER));
    let fields = assert_ok!(assistant.extract_fields(&upload).await);
    assert_eq!(fields["headline"], "Run Free");
    assert_eq!(fields["features"][1], "Fast");

    let request = &server.received_requests().await.unwrap()[0];
    let body: Value = serde_json::from_slice(&request.body).unwrap();
    let content = &body["messages"][0]["content"];
    assert_eq!(content[0]["type"], "image");
    assert_eq!(content[0]["source"]["media_type"], "image/png");
    assert_eq!(content[0]["source"]["data"], base64::encode(PNG_HEADER));
    assert!(body.get("temperature").is_none());
}

#[tokio::test]
async fn test_autofill_and_describe() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(text_reply(
            "{\"headline\": \"Fresh Coffee Daily\", \"cta_text\": \"Order Now\"}",
        ))
        .mount(&server)
        .await;

    let client = claude(&server);
    let assistant = AdAssistant::new(
        Some(client.clone() as Arc<dyn TextGenerator>),
        Some(client as Arc<dyn VisionAnalyzer>),
    );

    let data = assistant
        .autofill_fields("Single-origin coffee beans", Some("Food"), None)
        .await
        .unwrap();
    assert_eq!(data["cta_text"], "Order Now");

    let request = &server.received_requests().await.unwrap()[0];
    let body: Value = serde_json::from_slice(&request.body).unwrap();
    let prompt = body["messages"][0]["content"][0]["text"].as_str().unwrap();
    assert!(prompt.contains("- Description: Single-origin coffee beans"));
    assert!(prompt.contains("- Category: Food"));
    assert!(prompt.contains("- Brand: not specified"));

    let description = assistant
        .describe_reference_image(&base64::encode(PNG_HEADER))
        .await
        .unwrap();
    assert!(description.contains("Fresh Coffee Daily"));
}
