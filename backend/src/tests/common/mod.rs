// Common test utilities and helpers

use async_trait::async_trait;
use axum::{
    Json, Router,
    body::{Body, Bytes, to_bytes},
    extract::{Path, Query, State},
    http::{HeaderMap, Method, Request, StatusCode, header},
    response::IntoResponse,
    routing::post,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

use crate::config::Config;
use crate::services::gemini::{GenerateContentRequest, InferenceClient};
use crate::utils::{ApiError, ApiResult};
use crate::{AppState, build_router};

pub const TEST_API_KEY: &str = "test-api-key-0123";
pub const TEST_MODEL: &str = "gemini-test";

/// 1x1 pixel JPEG
pub const TINY_JPEG_BASE64: &str = "/9j/4AAQSkZJRgABAQEASABIAAD/2wBDAP//////////////////////////////////////////////////////////////////////////////////////wgALCAABAAEBAREA/8QAFBABAAAAAAAAAAAAAAAAAAAAAP/aAAgBAQABPxA=";

pub const UPSTREAM_OK_BODY: &str = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Una tazza in ceramica."}]},"finishReason":"STOP"}],"modelVersion":"gemini-test"}"#;

/// Config pointing at `base_url` with a test key and a short timeout
pub fn test_config(base_url: &str) -> Config {
    let mut config = Config::default();
    config.upstream.base_url = base_url.to_string();
    config.upstream.model = TEST_MODEL.to_string();
    config.upstream.api_key = TEST_API_KEY.to_string();
    config.upstream.timeout_secs = 5;
    config
}

/// In-memory inference client that records every call
pub struct MockInferenceClient {
    calls: AtomicUsize,
    requests: Mutex<Vec<GenerateContentRequest>>,
    failure: Option<(u16, &'static str)>,
}

impl MockInferenceClient {
    pub fn replying() -> Arc<Self> {
        Arc::new(Self { calls: AtomicUsize::new(0), requests: Mutex::new(Vec::new()), failure: None })
    }

    pub fn failing(status: u16, body: &'static str) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            failure: Some((status, body)),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<GenerateContentRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl InferenceClient for MockInferenceClient {
    async fn generate_content(&self, request: &GenerateContentRequest) -> ApiResult<Bytes> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        match self.failure {
            Some((status, body)) => Err(ApiError::UpstreamStatus {
                status,
                reason: "Mocked failure".to_string(),
                body: body.to_string(),
            }),
            None => Ok(Bytes::from_static(UPSTREAM_OK_BODY.as_bytes())),
        }
    }
}

/// Router wired to the given inference client
pub fn app_with_client(client: Arc<dyn InferenceClient>) -> Router {
    let state = AppState::with_client(test_config("http://127.0.0.1:9/v1beta"), client);
    build_router(Arc::new(state))
}

/// Router wired to the given inference client, with CORS for `origins`
pub fn app_with_cors(client: Arc<dyn InferenceClient>, origins: &[&str]) -> Router {
    let mut config = test_config("http://127.0.0.1:9/v1beta");
    config.server.cors_origins = origins.iter().map(|origin| origin.to_string()).collect();
    build_router(Arc::new(AppState::with_client(config, client)))
}

/// CORS preflight for a POST to `uri` from `origin`
pub fn preflight_request(uri: &str, origin: &str) -> Request<Body> {
    Request::builder()
        .method(Method::OPTIONS)
        .uri(uri)
        .header(header::ORIGIN, origin)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap()
}

/// Router wired to a real Gemini client talking to `base_url`
pub fn app_with_upstream(base_url: &str) -> Router {
    build_router(Arc::new(AppState::new(test_config(base_url))))
}

pub fn analyze_body(tone: &str, question: Option<&str>, lang: Option<&str>) -> serde_json::Value {
    let mut body = serde_json::json!({
        "base64ImageData": TINY_JPEG_BASE64,
        "mimeType": "image/jpeg",
        "tone": tone,
    });
    if let Some(question) = question {
        body["question"] = question.into();
    }
    if let Some(lang) = lang {
        body["lang"] = lang.into();
    }
    body
}

pub fn json_request(method: Method, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

/// Drive one request through the router
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, HeaderMap, Bytes) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, body)
}

pub fn json(body: &[u8]) -> serde_json::Value {
    serde_json::from_slice(body).unwrap()
}

// ============================================================================
// Mock upstream HTTP server
// ============================================================================

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub target: String,
    pub key: Option<String>,
    pub payload: GenerateContentRequest,
}

#[derive(Clone)]
struct MockUpstreamState {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    status: StatusCode,
    body: &'static str,
}

pub struct MockUpstream {
    pub base_url: String,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockUpstream {
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

async fn record_generate_content(
    State(state): State<MockUpstreamState>,
    Path(target): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    Json(payload): Json<GenerateContentRequest>,
) -> impl IntoResponse {
    state.calls.lock().unwrap().push(RecordedCall {
        target,
        key: query.get("key").cloned(),
        payload,
    });
    (state.status, [(header::CONTENT_TYPE, "application/json")], state.body)
}

/// Serve `POST /v1beta/models/{target}` on an ephemeral port, answering
/// every call with `status` and `body`.
pub async fn spawn_mock_upstream(status: StatusCode, body: &'static str) -> MockUpstream {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let state = MockUpstreamState { calls: calls.clone(), status, body };
    let app = Router::new()
        .route("/v1beta/models/:target", post(record_generate_content))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockUpstream { base_url: format!("http://{}/v1beta", addr), calls }
}

/// A base URL nothing is listening on
pub async fn closed_upstream_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/v1beta", addr)
}
