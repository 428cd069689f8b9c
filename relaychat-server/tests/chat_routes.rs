//! Route tests driven through the router with a scripted provider, so no
//! network access is needed.

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use futures::stream;
use relaychat_core::http::RequestOptions;
use relaychat_core::protocol::{ChatRequest, ChatStreamChunk, Role};
use relaychat_core::providers::{ChatStream, CompletionProvider, ProviderError, ProviderResult};
use relaychat_core::{CompletionAggregator, CompletionSettings};
use relaychat_server::{router, AppState, IndexPage};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tower::ServiceExt;

/// Replays fixed fragments and remembers the requests it was given
struct ScriptedProvider {
    fragments: Vec<&'static str>,
    fail_with: Option<String>,
    seen: Mutex<Vec<ChatRequest>>,
}

impl ScriptedProvider {
    fn replying(fragments: Vec<&'static str>) -> Arc<Self> {
        Arc::new(Self {
            fragments,
            fail_with: None,
            seen: Mutex::new(Vec::new()),
        })
    }

    fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            fragments: Vec::new(),
            fail_with: Some(message.to_string()),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<ChatRequest> {
        self.seen.lock().unwrap().clone()
    }
}

fn chunk(content: &str) -> ChatStreamChunk {
    serde_json::from_value(json!({
        "choices": [{"index": 0, "delta": {"content": content}}]
    }))
    .unwrap()
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn stream_chat(
        &self,
        request: ChatRequest,
        _options: RequestOptions,
    ) -> ProviderResult<ChatStream> {
        self.seen.lock().unwrap().push(request);
        if let Some(message) = &self.fail_with {
            return Err(ProviderError::Authentication(message.clone()));
        }
        let items: Vec<ProviderResult<ChatStreamChunk>> =
            self.fragments.iter().map(|f| Ok(chunk(f))).collect();
        Ok(Box::pin(stream::iter(items)))
    }
}

fn app_with(provider: Arc<ScriptedProvider>, index: IndexPage, static_dir: &Path) -> Router {
    let aggregator = CompletionAggregator::new(provider, CompletionSettings::default());
    router(AppState::new(aggregator, index), static_dir)
}

fn app(provider: Arc<ScriptedProvider>) -> Router {
    app_with(provider, IndexPage::Embedded, Path::new("static"))
}

async fn post_chat(app: Router, body: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::post("/chat")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_chat_returns_concatenated_fragments() {
    let provider = ScriptedProvider::replying(vec!["Hi", " there"]);
    let (status, body) = post_chat(app(provider.clone()), r#"{"message":"hi","history":[]}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"response": "Hi there"}));

    let requests = provider.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].messages.len(), 1);
    assert_eq!(requests[0].messages[0].role, Role::User);
    assert_eq!(requests[0].messages[0].content, "hi");
    assert_eq!(requests[0].stream, Some(true));
}

#[tokio::test]
async fn test_chat_sends_history_in_order() {
    let provider = ScriptedProvider::replying(vec!["Here's one", "..."]);
    let body = r#"{
        "message": "Tell me a joke",
        "history": [{"user": "Hello", "bot": "Hi!"}]
    }"#;
    let (status, response) = post_chat(app(provider.clone()), body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["response"], "Here's one...");

    let turns = &provider.requests()[0].messages;
    let shape: Vec<(Role, &str)> = turns.iter().map(|t| (t.role, t.content.as_str())).collect();
    assert_eq!(
        shape,
        vec![
            (Role::User, "Hello"),
            (Role::Assistant, "Hi!"),
            (Role::User, "Tell me a joke"),
        ]
    );
}

#[tokio::test]
async fn test_chat_skips_malformed_history_entries() {
    let provider = ScriptedProvider::replying(vec!["ok"]);
    let body = r#"{"message":"Hi","history":["garbage",{"user":"a","bot":"b"}]}"#;
    let (status, response) = post_chat(app(provider.clone()), body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["response"], "ok");
    assert_eq!(provider.requests()[0].messages.len(), 3);
}

#[tokio::test]
async fn test_chat_with_no_fragments_returns_empty_response() {
    let provider = ScriptedProvider::replying(vec![]);
    let (status, body) = post_chat(app(provider), r#"{"message":"hi","history":[]}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"response": ""}));
}

#[tokio::test]
async fn test_provider_failure_returns_500_without_response() {
    let provider = ScriptedProvider::failing("Invalid API Key");
    let (status, body) = post_chat(app(provider), r#"{"message":"hi","history":[]}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("Invalid API Key"));
    assert!(body.get("response").is_none());
}

#[tokio::test]
async fn test_missing_fields_are_fatal() {
    for body in [
        r#"{"history":[]}"#,
        r#"{"message":"hi"}"#,
        r#"{"message":"hi","history":"nope"}"#,
        "not json",
    ] {
        let provider = ScriptedProvider::replying(vec!["unused"]);
        let (status, response) = post_chat(app(provider.clone()), body).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "body: {}", body);
        assert!(response["error"].as_str().is_some_and(|e| !e.is_empty()));
        assert!(provider.requests().is_empty());
    }
}

#[tokio::test]
async fn test_oversized_body_is_a_json_error() {
    let provider = ScriptedProvider::replying(vec!["unused"]);
    let huge = "x".repeat(3 * 1024 * 1024);
    let body = json!({"message": "hi", "history": [{"user": huge, "bot": ""}]}).to_string();

    let (status, response) = post_chat(app(provider.clone()), &body).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response["error"]
        .as_str()
        .is_some_and(|e| e.starts_with("Unreadable request body")));
    assert!(response.get("response").is_none());
    assert!(provider.requests().is_empty());
}

#[tokio::test]
async fn test_content_type_is_not_enforced() {
    let provider = ScriptedProvider::replying(vec!["ok"]);
    let response = app(provider)
        .oneshot(
            Request::post("/chat")
                .header("content-type", "text/plain")
                .body(Body::from(r#"{"message":"hi","history":[]}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_index_serves_embedded_page() {
    let provider = ScriptedProvider::replying(vec![]);
    let response = app(provider)
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&bytes).contains("/static/script.js"));
}

#[tokio::test]
async fn test_index_can_be_read_from_disk() {
    let dir = TempDir::new().unwrap();
    let page = dir.path().join("index.html");
    std::fs::write(&page, "<html><body>custom page</body></html>").unwrap();

    let provider = ScriptedProvider::replying(vec![]);
    let app = app_with(provider, IndexPage::from(Some(page)), dir.path());
    let response = app
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"<html><body>custom page</body></html>");
}

#[tokio::test]
async fn test_unreadable_index_is_an_internal_error() {
    let dir = TempDir::new().unwrap();
    let provider = ScriptedProvider::replying(vec![]);
    let app = app_with(
        provider,
        IndexPage::File(dir.path().join("missing.html")),
        dir.path(),
    );
    let response = app
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "Internal server error");
}

#[tokio::test]
async fn test_static_files_are_served() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("app.js"), "console.log('ok');").unwrap();

    let provider = ScriptedProvider::replying(vec![]);
    let app = app_with(provider, IndexPage::Embedded, dir.path());

    let response = app
        .clone()
        .oneshot(Request::get("/static/app.js").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"console.log('ok');");

    let missing = app
        .oneshot(Request::get("/static/nope.js").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let provider = ScriptedProvider::replying(vec![]);
    let response = app(provider)
        .oneshot(Request::get("/unknown").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
