//! End-to-end session cycle: submit -> completion -> transcript update,
//! with the Gemini endpoint mocked.

use serde_json::json;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use sketchgen::app::{App, ChatRole};
use sketchgen::config::Config;

fn app_against(server: &MockServer) -> App {
    let config = Config {
        gemini_api_key: Some("test-key".to_string()),
        model: None,
    };
    let mut app = App::new(&config).unwrap();
    app.gemini = app.gemini.clone().with_base_url(&server.uri());
    app
}

#[tokio::test]
async fn successful_cycle_grows_the_transcript_by_two() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "parts": [{"text": "void loop() {}"}] }
            }]
        })))
        .mount(&server)
        .await;

    let mut app = app_against(&server);
    app.input = "Connect to WiFi and print IP".to_string();

    let prompt = app.begin_submit().unwrap();
    assert_eq!(app.transcript.len(), 1);

    let result = app.gemini.generate(&prompt).await;
    app.apply_completion(result);

    assert_eq!(app.transcript.len(), 2);
    assert_eq!(app.transcript[0].role, ChatRole::User);
    assert_eq!(app.transcript[1].role, ChatRole::Assistant);
    assert_eq!(app.transcript[1].content, "void loop() {}");
    assert!(app.last_error.is_none());
}

#[tokio::test]
async fn failed_cycle_keeps_only_the_user_entry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": { "code": 403, "message": "API key not valid" }
        })))
        .mount(&server)
        .await;

    let mut app = app_against(&server);
    app.input = "Read a soil moisture sensor".to_string();

    let prompt = app.begin_submit().unwrap();
    let result = app.gemini.generate(&prompt).await;
    app.apply_completion(result);

    assert_eq!(app.transcript.len(), 1);
    assert_eq!(app.transcript[0].role, ChatRole::User);
    let error = app.last_error.expect("failure should be surfaced");
    assert!(error.contains("API key not valid"), "got: {error}");
}

#[tokio::test]
async fn spawned_completion_is_reaped_by_polling() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "parts": [{"text": "done"}] }
            }]
        })))
        .mount(&server)
        .await;

    let mut app = app_against(&server);
    app.input = "Drive a servo".to_string();

    let prompt = app.begin_submit().unwrap();
    let gemini = app.gemini.clone();
    app.query_task = Some(tokio::spawn(async move { gemini.generate(&prompt).await }));

    // Poll until the background task lands, as the tick handler does
    for _ in 0..200 {
        app.poll_completion().await;
        if !app.loading {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }

    assert!(!app.loading, "completion never finished");
    assert_eq!(app.transcript.len(), 2);
    assert_eq!(app.transcript[1].content, "done");
}
