//! End-to-end tests for the fetch → transform workflow through the protocol handler.
//!
//! Both upstream providers are served by one wiremock server on distinct paths.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use tokio::sync::Mutex;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use searchscape_mcp::config::ServerConfig;
use searchscape_mcp::protocol::ProtocolHandler;
use searchscape_mcp::session::ImageSessionManager;
use searchscape_mcp::types::*;

// ─────────────────────── helpers ───────────────────────

fn handler_for(server: &MockServer) -> ProtocolHandler {
    let config = ServerConfig {
        unsplash_access_key: "test-key".to_string(),
        hf_api_key: "hf-key".to_string(),
        unsplash_url: server.uri(),
        hf_url: server.uri(),
        timeout: Duration::from_secs(5),
    };
    ProtocolHandler::new(Arc::new(Mutex::new(ImageSessionManager::new(&config))))
}

fn tool_call(id: i64, name: &str, arguments: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": { "name": name, "arguments": arguments }
    })
}

async fn send(handler: &ProtocolHandler, msg: Value) -> Value {
    let parsed: JsonRpcMessage = serde_json::from_value(msg).unwrap();
    handler.handle_message(parsed).await.expect("expected response")
}

fn result_text(resp: &Value) -> &str {
    resp["result"]["content"][0]["text"].as_str().unwrap_or("")
}

fn is_error(resp: &Value) -> bool {
    resp["result"]["isError"].as_bool().unwrap_or(false)
}

async fn stored_image(handler: &ProtocolHandler, user: &str) -> Option<String> {
    handler.session().lock().await.image_for(user)
}

async fn mount_photo(server: &MockServer, url: &str) {
    Mock::given(method("GET"))
        .and(path("/photos/random"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "urls": { "regular": url } })),
        )
        .mount(server)
        .await;
}

async fn fetch(handler: &ProtocolHandler, user: &str, prompt: &str) -> Value {
    send(
        handler,
        tool_call(1, "fetch-image", json!({ "prompt": prompt, "userId": user })),
    )
    .await
}

async fn transform(handler: &ProtocolHandler, user: &str, filter: &str) -> Value {
    send(
        handler,
        tool_call(2, "transform-image", json!({ "filter": filter, "userId": user })),
    )
    .await
}

// ═══════════════════════════════════════════════════════
// FETCH
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn test_fetch_empty_prompt_makes_no_upstream_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let handler = handler_for(&server);

    let resp = fetch(&handler, "u1", "").await;

    assert!(is_error(&resp), "got: {resp}");
    assert_eq!(result_text(&resp), "Error: Prompt is missing");
    assert!(stored_image(&handler, "u1").await.is_none());
}

#[tokio::test]
async fn test_fetch_missing_user_id() {
    let server = MockServer::start().await;
    let handler = handler_for(&server);

    let resp = send(
        &handler,
        tool_call(1, "fetch-image", json!({ "prompt": "beach" })),
    )
    .await;

    assert!(is_error(&resp));
    assert_eq!(
        result_text(&resp),
        "Error: UserId is required to track the sessions"
    );
}

#[tokio::test]
async fn test_fetch_upstream_forbidden_leaves_store_unchanged() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/photos/random"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    let handler = handler_for(&server);

    let resp = fetch(&handler, "u1", "forest").await;

    assert!(is_error(&resp));
    assert_eq!(result_text(&resp), "Error: Unsplash API error: 403");
    assert!(handler.session().lock().await.store().is_empty());
}

#[tokio::test]
async fn test_fetch_success_records_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/photos/random"))
        .and(query_param("query", "red fox"))
        .and(query_param("client_id", "test-key"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "urls": { "regular": "http://img/1" } })),
        )
        .expect(1)
        .mount(&server)
        .await;
    let handler = handler_for(&server);

    let resp = fetch(&handler, "u1", "red fox").await;

    assert!(!is_error(&resp), "got: {resp}");
    assert!(resp["result"].get("isError").is_none());
    assert!(result_text(&resp).contains("http://img/1"));
    assert_eq!(
        result_text(&resp),
        "Image fetched successfully! Image URL: http://img/1"
    );
    assert_eq!(stored_image(&handler, "u1").await.as_deref(), Some("http://img/1"));
}

#[tokio::test]
async fn test_fetch_malformed_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "abc" })))
        .mount(&server)
        .await;
    let handler = handler_for(&server);

    let resp = fetch(&handler, "u1", "forest").await;

    assert!(is_error(&resp));
    assert_eq!(result_text(&resp), "Error: Invalid response from Unsplash API");
}

#[tokio::test]
async fn test_second_fetch_overwrites() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("query", "first"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "urls": { "regular": "http://img/first" } })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("query", "second"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "urls": { "regular": "http://img/second" } })),
        )
        .mount(&server)
        .await;
    let handler = handler_for(&server);

    fetch(&handler, "u1", "first").await;
    fetch(&handler, "u1", "second").await;

    assert_eq!(
        stored_image(&handler, "u1").await.as_deref(),
        Some("http://img/second")
    );
}

// ═══════════════════════════════════════════════════════
// TRANSFORM
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn test_transform_without_fetch_is_precondition_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let handler = handler_for(&server);

    let resp = transform(&handler, "u2", "enhance").await;

    assert!(is_error(&resp));
    assert_eq!(
        result_text(&resp),
        "Error: No image found. Please fetch an image first using fetch-image"
    );
}

#[tokio::test]
async fn test_transform_unknown_filter_lists_choices() {
    let server = MockServer::start().await;
    mount_photo(&server, "http://img/1").await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let handler = handler_for(&server);

    fetch(&handler, "u1", "lake").await;
    let resp = transform(&handler, "u1", "bogus").await;

    assert!(is_error(&resp));
    assert_eq!(
        result_text(&resp),
        "Error: Invalid filter. Please choose: artistic, enhance, or translate"
    );
}

#[tokio::test]
async fn test_transform_missing_output_keeps_session() {
    let server = MockServer::start().await;
    mount_photo(&server, "http://img/1").await;
    Mock::given(method("POST"))
        .and(path("/models/eugenesiow/super-image"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "label": "x" }])))
        .expect(1)
        .mount(&server)
        .await;
    let handler = handler_for(&server);

    fetch(&handler, "u1", "lake").await;
    let resp = transform(&handler, "u1", "enhance").await;

    assert!(is_error(&resp));
    assert_eq!(
        result_text(&resp),
        "Error: Image enhancement failed: No output image"
    );
    assert_eq!(stored_image(&handler, "u1").await.as_deref(), Some("http://img/1"));
}

#[tokio::test]
async fn test_transform_upstream_status() {
    let server = MockServer::start().await;
    mount_photo(&server, "http://img/1").await;
    Mock::given(method("POST"))
        .and(path("/models/lambdalabs/sd-style-transfer"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let handler = handler_for(&server);

    fetch(&handler, "u1", "lake").await;
    let resp = transform(&handler, "u1", "artistic").await;

    assert!(is_error(&resp));
    assert_eq!(result_text(&resp), "Error: Hugging Face API error: 500");
}

#[tokio::test]
async fn test_transform_success_case_insensitive() {
    let server = MockServer::start().await;
    mount_photo(&server, "http://img/1").await;
    Mock::given(method("POST"))
        .and(path("/models/eugenesiow/super-image"))
        .and(header("authorization", "Bearer hf-key"))
        .and(body_json(json!({ "inputs": "http://img/1" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{ "generated_image": "http://out/sharp" }])),
        )
        .expect(1)
        .mount(&server)
        .await;
    let handler = handler_for(&server);

    fetch(&handler, "u1", "lake").await;
    let resp = transform(&handler, "u1", "ENHANCE").await;

    assert!(!is_error(&resp), "got: {resp}");
    assert_eq!(
        result_text(&resp),
        "Image transformed with ENHANCE filter successfully! Transformed image URL: http://out/sharp"
    );
    assert_eq!(stored_image(&handler, "u1").await.as_deref(), Some("http://img/1"));
}

#[tokio::test]
async fn test_translate_sends_instruction() {
    let server = MockServer::start().await;
    mount_photo(&server, "http://img/1").await;
    Mock::given(method("POST"))
        .and(path("/models/timbrooks/instruct-pix2pix"))
        .and(body_json(json!({
            "inputs": { "image": "http://img/1", "prompt": "make it look like a cartoon" }
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{ "generated_image": "http://out/toon" }])),
        )
        .expect(1)
        .mount(&server)
        .await;
    let handler = handler_for(&server);

    fetch(&handler, "u1", "lake").await;
    let resp = transform(&handler, "u1", "translate").await;
    assert!(result_text(&resp).contains("http://out/toon"));

    // Not one of the advertised filters, so no second upstream call.
    let resp = transform(&handler, "u1", "cartoon").await;
    assert!(is_error(&resp));
    assert_eq!(
        result_text(&resp),
        "Error: Invalid filter. Please choose: artistic, enhance, or translate"
    );
}

#[tokio::test]
async fn test_sessions_are_isolated() {
    let server = MockServer::start().await;
    mount_photo(&server, "http://img/1").await;
    let handler = handler_for(&server);

    fetch(&handler, "alice", "lake").await;
    let resp = transform(&handler, "bob", "enhance").await;

    assert!(is_error(&resp));
    assert!(result_text(&resp).contains("Please fetch an image first"));
}

#[tokio::test]
async fn test_wrong_argument_type_is_tool_error() {
    let server = MockServer::start().await;
    let handler = handler_for(&server);

    let resp = send(
        &handler,
        tool_call(1, "transform-image", json!({ "filter": 7, "userId": "u1" })),
    )
    .await;

    assert!(is_error(&resp));
    assert!(result_text(&resp).starts_with("Error: Invalid arguments"));
}

#[tokio::test]
async fn test_user_id_is_used_verbatim() {
    let server = MockServer::start().await;
    mount_photo(&server, "http://img/1").await;
    let handler = handler_for(&server);

    fetch(&handler, "u1 ", "lake").await;

    assert_eq!(stored_image(&handler, "u1 ").await.as_deref(), Some("http://img/1"));
    assert!(stored_image(&handler, "u1").await.is_none());

    let resp = transform(&handler, "u1", "enhance").await;
    assert!(is_error(&resp));
    assert!(result_text(&resp).contains("Please fetch an image first"));
}
