mod common;

use axum::http::StatusCode;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::TestApp;
use functions_service::services::providers::mock::{MockImageProvider, MOCK_PNG};
use functions_service::services::MockStorage;
use functions_service::startup::MAX_BODY_BYTES;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn generate_image_uploads_and_returns_public_url() {
    let app = TestApp::builder()
        .images(MockImageProvider::with_revised_prompt(Some("A red fox, watercolor")))
        .build();

    let response = app
        .call("generate-image", json!({ "prompt": "a fox", "style": "vivid" }))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    let file_name = body["fileName"].as_str().unwrap();
    assert!(file_name.starts_with("generated-") && file_name.ends_with(".png"));
    assert_eq!(
        body["imageUrl"],
        format!("https://storage.test/generated-images/{}", file_name)
    );
    assert_eq!(body["prompt"], "a fox");
    assert_eq!(body["size"], "1024x1024");
    assert_eq!(body["quality"], "standard");
    assert_eq!(body["revisedPrompt"], "A red fox, watercolor");

    assert_eq!(app.storage.uploads(), vec![(file_name.to_string(), MOCK_PNG.len())]);
}

#[tokio::test]
async fn generate_image_twice_yields_distinct_urls() {
    let app = TestApp::new();

    let first = app.call("generate-image", json!({ "prompt": "a fox" })).await.json();
    let second = app.call("generate-image", json!({ "prompt": "a fox" })).await.json();

    assert_ne!(first["imageUrl"], second["imageUrl"]);
    assert_eq!(app.storage.uploads().len(), 2);
}

#[tokio::test]
async fn generate_image_keeps_requested_parameters() {
    let app = TestApp::new();

    let body = app
        .call(
            "generate-image",
            json!({ "prompt": "a fox", "size": "1792x1024", "quality": "hd" }),
        )
        .await
        .json();

    assert_eq!(body["size"], "1792x1024");
    assert_eq!(body["quality"], "hd");
    assert_eq!(body["revisedPrompt"], serde_json::Value::Null);
}

#[tokio::test]
async fn generate_image_requires_prompt() {
    let app = TestApp::new();
    let response = app.call("generate-image", json!({ "size": "1024x1024" })).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "prompt is required");
}

#[tokio::test]
async fn generation_failure_surfaces_upstream_message() {
    let app = TestApp::builder()
        .images(MockImageProvider::failing("Your request was rejected by the safety system"))
        .build();

    let response = app.call("generate-image", json!({ "prompt": "x" })).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.error(), "Your request was rejected by the safety system");
    assert!(app.storage.uploads().is_empty());
}

#[tokio::test]
async fn upload_failure_is_server_error_with_default_message() {
    let app = TestApp::builder().storage(MockStorage::failing()).build();

    let response = app.call("generate-image", json!({ "prompt": "x" })).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.error(), "Failed to generate image");
}

#[tokio::test]
async fn missing_credentials_are_not_configured() {
    let no_key = TestApp::builder().without_images().build();
    let response = no_key.call("generate-image", json!({ "prompt": "x" })).await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.error(), "OPENAI_API_KEY is not configured");

    let no_storage = TestApp::builder().without_storage().build();
    let response = no_storage.call("edit-image", json!({ "prompt": "x", "imageUrl": "data:image/png;base64,AA==" })).await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.error().contains("not configured"));
}

#[tokio::test]
async fn edit_image_accepts_data_url() {
    let app = TestApp::new();
    let source = format!("data:image/png;base64,{}", STANDARD.encode(MOCK_PNG));

    let response = app
        .call("edit-image", json!({ "prompt": "add a hat", "imageUrl": source }))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert!(body["fileName"].as_str().unwrap().starts_with("edited-"));
    assert_eq!(body["sourceImageUrl"], source);
    assert_eq!(body["size"], "1024x1024");
    assert_eq!(body["prompt"], "add a hat");
}

#[tokio::test]
async fn edit_image_accepts_data_url_above_two_megabytes() {
    let app = TestApp::new();
    let mut image = MOCK_PNG.to_vec();
    image.resize(3 * 1024 * 1024, 0);
    let source = format!("data:image/png;base64,{}", STANDARD.encode(&image));

    let response = app
        .call("edit-image", json!({ "prompt": "add a hat", "imageUrl": source }))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.json()["fileName"].as_str().unwrap().starts_with("edited-"));
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let app = TestApp::new();
    let source = format!("data:image/png;base64,{}", "A".repeat(MAX_BODY_BYTES));

    let response = app
        .call("edit-image", json!({ "prompt": "x", "imageUrl": source }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn edit_image_downloads_http_source() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/images/source.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(MOCK_PNG.to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let app = TestApp::new();
    let source = format!("{}/images/source.png", server.uri());

    let response = app
        .call("edit-image", json!({ "prompt": "add a hat", "imageUrl": source, "size": "512x512" }))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["size"], "512x512");
}

#[tokio::test]
async fn edit_image_rejects_unsupported_url() {
    let app = TestApp::new();

    let response = app
        .call("edit-image", json!({ "prompt": "x", "imageUrl": "file:///etc/passwd" }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn edit_image_requires_image_url() {
    let app = TestApp::new();
    let response = app.call("edit-image", json!({ "prompt": "x" })).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "imageUrl is required");
}
