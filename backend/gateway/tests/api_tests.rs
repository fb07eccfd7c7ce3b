//! API integration tests.

use std::io::Cursor;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use codelens_agent::ChatAgent;
use codelens_core::{ChatError, LlmProvider};
use codelens_gateway::{GatewayState, build_router};
use codelens_media::UploadPolicy;
use codelens_model::{MockProvider, OllamaProvider};
use codelens_understanding::OcrEngine;
use image::{GrayImage, ImageFormat, Luma};
use serde_json::{Value, json};
use tower::ServiceExt;

struct FixedOcr(&'static str);

#[async_trait]
impl OcrEngine for FixedOcr {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn recognize(&self, _image: &GrayImage) -> Result<String, ChatError> {
        Ok(self.0.to_string())
    }
}

fn test_state(llm: Arc<dyn LlmProvider>, ocr_text: &'static str) -> GatewayState {
    GatewayState::new(
        ChatAgent::new(llm, Arc::new(FixedOcr(ocr_text))),
        UploadPolicy::default(),
    )
}

fn png() -> Vec<u8> {
    let img = GrayImage::from_pixel(8, 8, Luma([200u8]));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png).unwrap();
    buf
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024 * 1024)
        .await
        .unwrap();
    (status, body.to_vec())
}

async fn get_json(app: Router, uri: &str) -> Value {
    let (status, body) = send(
        app,
        Request::builder().uri(uri).method(Method::GET).body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_slice(&body).unwrap()
}

async fn post_json(app: Router, uri: &str, payload: Value) -> (StatusCode, Value) {
    let (status, body) = send(
        app,
        Request::builder()
            .uri(uri)
            .method(Method::POST)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap(),
    )
    .await;
    (status, serde_json::from_slice(&body).unwrap())
}

fn multipart_body(boundary: &str, question: &str, file: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"question\"\r\n\r\n{question}\r\n"
        )
        .as_bytes(),
    );
    let (filename, data) = file.unwrap_or(("", &[]));
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}

fn submit_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .uri("/submit")
        .method(Method::POST)
        .header(header::CONTENT_TYPE, "multipart/form-data; boundary=XBOUNDARYX")
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = build_router(test_state(Arc::new(MockProvider::new("mock")), ""));
    let json = get_json(app, "/api/health").await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["model_provider"], "mock");
    assert_eq!(json["ocr_engine"], "fixed");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_index_renders_empty_session() {
    let app = build_router(test_state(Arc::new(MockProvider::new("mock")), ""));
    let (status, body) = send(
        app,
        Request::builder().uri("/").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let page = String::from_utf8(body).unwrap();
    assert!(page.contains("No chat history yet."));
    assert!(page.contains("Clear History"));
}

#[tokio::test]
async fn test_ask_appends_question_and_reply() {
    let state = test_state(Arc::new(MockProvider::new("mock").with_response("A trait object.")), "");
    let app = build_router(state.clone());

    let (status, json) =
        post_json(app.clone(), "/api/ask", json!({ "question": "What is dyn Trait?" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["replies"], json!(["A trait object."]));
    assert_eq!(json["outcome"]["appended"], 2);

    let conversation = get_json(app, "/api/conversation").await;
    let entries = conversation["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["role"], "user");
    assert_eq!(entries[0]["text"], "What is dyn Trait?");
    assert_eq!(entries[1]["role"], "bot");
}

#[tokio::test]
async fn test_ask_rejects_blank_question() {
    let app = build_router(test_state(Arc::new(MockProvider::new("mock")), ""));
    let (status, json) = post_json(app, "/api/ask", json!({ "question": "  " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "question is empty");
}

#[tokio::test]
async fn test_model_unreachable_yields_one_bot_entry() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let llm = Arc::new(OllamaProvider::new().with_base_url(format!("http://{addr}")));
    let state = test_state(llm, "");
    let app = build_router(state.clone());

    let (status, json) = post_json(app, "/api/ask", json!({ "question": "hello?" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["outcome"]["error"], "model_connection");

    let replies = json["replies"].as_array().unwrap();
    assert_eq!(replies.len(), 1);
    assert!(replies[0].as_str().unwrap().starts_with("Error connecting to model:"));

    let session = state.session.lock().await;
    assert_eq!(session.conversation().len(), 2);
}

#[tokio::test]
async fn test_explain_blank_ocr_skips_model() {
    let llm = Arc::new(MockProvider::new("mock"));
    let app = build_router(test_state(llm.clone(), "\n   \n"));

    let (status, body) = send(
        app,
        Request::builder()
            .uri("/api/explain?filename=shot.png")
            .method(Method::POST)
            .header(header::CONTENT_TYPE, "image/png")
            .body(Body::from(png()))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["replies"], json!(["📄 Extracted Code:\n\nno text detected"]));
    assert_eq!(json["outcome"]["model_called"], false);
    assert_eq!(llm.calls(), 0);
}

#[tokio::test]
async fn test_explain_rejects_disallowed_type() {
    let app = build_router(test_state(Arc::new(MockProvider::new("mock")), "x"));
    let (status, body) = send(
        app,
        Request::builder()
            .uri("/api/explain?filename=clip.gif")
            .method(Method::POST)
            .body(Body::from(vec![b'G', b'I', b'F', b'8']))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "file type 'gif' is not allowed");
}

#[tokio::test]
async fn test_form_submit_image_then_clear_history() {
    let llm = Arc::new(MockProvider::new("mock").with_response("Adds one."));
    let state = test_state(llm.clone(), "Terminal Help\nx += 1\n");
    let app = build_router(state.clone());

    let image = png();
    let (status, _) = send(
        app.clone(),
        submit_request(multipart_body("XBOUNDARYX", "", Some(("code.png", &image)))),
    )
    .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(llm.prompts(), vec!["Explain this code in detail:\n\nx += 1"]);

    let history = get_json(app.clone(), "/api/history").await;
    assert_eq!(history["entries"][0]["kind"], "image");
    assert!(history["entries"][0]["image"].as_str().unwrap().starts_with("data:image/png;base64,"));

    let (status, _) = send(
        app.clone(),
        Request::builder()
            .uri("/clear-history")
            .method(Method::POST)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::SEE_OTHER);

    let history = get_json(app.clone(), "/api/history").await;
    assert!(history["entries"].as_array().unwrap().is_empty());
    let conversation = get_json(app, "/api/conversation").await;
    assert_eq!(conversation["entries"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_form_submit_without_file_uses_question() {
    let llm = Arc::new(MockProvider::new("mock").with_response("Yes."));
    let state = test_state(llm.clone(), "unused");
    let app = build_router(state.clone());

    let (status, _) = send(
        app,
        submit_request(multipart_body("XBOUNDARYX", "Is Rust fast?", None)),
    )
    .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(llm.prompts(), vec!["Is Rust fast?"]);
    assert_eq!(state.session.lock().await.history().len(), 1);
}

#[tokio::test]
async fn test_form_submit_rejects_disallowed_upload() {
    let llm = Arc::new(MockProvider::new("mock"));
    let state = test_state(llm.clone(), "x");
    let app = build_router(state.clone());

    let (status, body) = send(
        app,
        submit_request(multipart_body("XBOUNDARYX", "", Some(("notes.txt", b"hello")))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(String::from_utf8(body).unwrap().contains("is not allowed"));
    assert_eq!(llm.calls(), 0);
    assert!(state.session.lock().await.is_empty());
}

#[tokio::test]
async fn test_reset_clears_both_sequences() {
    let state = test_state(Arc::new(MockProvider::new("mock")), "");
    let app = build_router(state.clone());

    post_json(app.clone(), "/api/ask", json!({ "question": "one" })).await;
    let (status, json) = post_json(app.clone(), "/api/reset", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "reset");

    let session = state.session.lock().await;
    assert!(session.conversation().is_empty());
    assert!(session.history().is_empty());
}
