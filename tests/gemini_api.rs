use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sketchgen::gemini::GeminiClient;

fn client_for(server: &MockServer) -> GeminiClient {
    GeminiClient::new("test-key").with_base_url(&server.uri())
}

#[tokio::test]
async fn generate_returns_the_candidate_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .and(query_param("key", "test-key"))
        .and(body_partial_json(json!({
            "contents": [{
                "role": "user",
                "parts": [{"text": "Blink an LED on pin 13"}]
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{"text": "void setup() { pinMode(13, OUTPUT); }"}]
                },
                "finishReason": "STOP"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let text = client_for(&server)
        .generate("Blink an LED on pin 13")
        .await
        .unwrap();

    assert_eq!(text, "void setup() { pinMode(13, OUTPUT); }");
}

#[tokio::test]
async fn multi_part_candidates_are_joined() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{"text": "first "}, {"text": "second"}]
                }
            }]
        })))
        .mount(&server)
        .await;

    let text = client_for(&server).generate("anything").await.unwrap();
    assert_eq!(text, "first second");
}

#[tokio::test]
async fn api_errors_surface_the_message_field() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {
                "code": 429,
                "message": "Resource has been exhausted",
                "status": "RESOURCE_EXHAUSTED"
            }
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).generate("anything").await.unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("429"), "unexpected error: {message}");
    assert!(
        message.contains("Resource has been exhausted"),
        "unexpected error: {message}"
    );
}

#[tokio::test]
async fn malformed_body_is_a_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client_for(&server).generate("anything").await.unwrap_err();
    assert!(format!("{err:#}").contains("failed to parse"));
}

#[tokio::test]
async fn empty_candidate_list_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let err = client_for(&server).generate("anything").await.unwrap_err();
    assert!(format!("{err:#}").contains("empty completion"));
}

#[tokio::test]
async fn a_configured_model_changes_the_endpoint_path() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-pro:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "parts": [{"text": "ok"}] }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = GeminiClient::new("test-key")
        .with_model("gemini-1.5-pro")
        .with_base_url(&server.uri());

    assert_eq!(client.generate("anything").await.unwrap(), "ok");
}
