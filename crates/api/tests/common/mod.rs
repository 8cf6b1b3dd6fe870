//! Shared harness for the HTTP integration tests.
//!
//! Mirrors the router construction in `main.rs` (same middleware stack)
//! but swaps the RunPod client for a scripted stub and the file store
//! for the in-memory store, so tests run hermetically.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, Method, Request, Response, StatusCode};
use axum::Router;
use async_trait::async_trait;
use http_body_util::BodyExt;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use rendergate_api::config::{RunPodConfig, ServerConfig, StorageConfig};
use rendergate_api::routes;
use rendergate_api::state::AppState;
use rendergate_core::provider::{PollStatus, Provider, ProviderError, SubmitInput};
use rendergate_core::resolver::ResultResolver;
use rendergate_core::JobController;
use rendergate_store::MemoryStore;

/// Provider stub driven by scripted responses.
///
/// `poll` falls back to `InProgress` when the script runs dry (a
/// background ingest loop may poll an unbounded number of times);
/// `submit` panics instead, because every submit is handler-driven and
/// must be scripted.
#[derive(Default)]
pub struct StubProvider {
    submit_results: Mutex<VecDeque<Result<String, ProviderError>>>,
    poll_results: Mutex<VecDeque<Result<PollStatus, ProviderError>>>,
    pub submit_calls: AtomicUsize,
    pub poll_calls: AtomicUsize,
}

impl StubProvider {
    pub fn on_submit(&self, result: Result<String, ProviderError>) {
        self.submit_results.lock().unwrap().push_back(result);
    }

    pub fn on_poll(&self, result: Result<PollStatus, ProviderError>) {
        self.poll_results.lock().unwrap().push_back(result);
    }

    pub fn poll_calls(&self) -> usize {
        self.poll_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Provider for StubProvider {
    async fn submit(&self, _input: &SubmitInput) -> Result<String, ProviderError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        self.submit_results
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected submit call")
    }

    async fn poll(&self, _provider_job_id: &str) -> Result<PollStatus, ProviderError> {
        self.poll_calls.fetch_add(1, Ordering::SeqCst);
        self.poll_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(PollStatus::InProgress))
    }
}

/// Everything a test needs to drive the app and inspect its guts.
pub struct TestApp {
    pub router: Router,
    pub provider: Arc<StubProvider>,
    pub store: Arc<MemoryStore>,
    /// Holds the storage tree alive for the test's duration.
    pub storage: tempfile::TempDir,
}

/// Build a test `ServerConfig` rooted at a temp storage dir.
pub fn test_config(storage_root: &Path, background_ingest: bool) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        max_upload_bytes: 16 * 1024 * 1024,
        background_ingest,
        ingest_deadline_secs: 600,
        poll_interval_secs: 1,
        storage: StorageConfig {
            root: storage_root.to_path_buf(),
        },
        runpod: RunPodConfig {
            api_base: "http://127.0.0.1:1".into(),
            endpoint_id: "test-endpoint".into(),
            api_key: "test-key".into(),
        },
    }
}

pub async fn build_test_app() -> TestApp {
    build_test_app_with(false).await
}

/// Build the full application router with all middleware layers.
pub async fn build_test_app_with(background_ingest: bool) -> TestApp {
    let storage = tempfile::tempdir().expect("tempdir");
    let config = test_config(storage.path(), background_ingest);
    config.storage.ensure_dirs().await.expect("storage dirs");

    let provider = Arc::new(StubProvider::default());
    let store = Arc::new(MemoryStore::new());
    let controller = Arc::new(JobController::new(
        store.clone(),
        provider.clone(),
        ResultResolver::new(config.storage.output_dir()),
    ));

    let state = AppState {
        controller,
        config: Arc::new(config.clone()),
        shutdown: CancellationToken::new(),
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    let request_id_header = HeaderName::from_static("x-request-id");

    let router = Router::new()
        .merge(routes::api_routes(config.max_upload_bytes))
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state);

    TestApp {
        router,
        provider,
        store,
        storage,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(router: Router, uri: &str) -> Response<Body> {
    router
        .oneshot(
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

pub async fn post_json(router: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    router
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

/// POST a single-file multipart upload under the `file` field.
pub async fn post_multipart_file(router: Router, uri: &str, contents: &[u8]) -> Response<Body> {
    let boundary = "rendergate-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        b"Content-Disposition: form-data; name=\"file\"; filename=\"in.mp4\"\r\n",
    );
    body.extend_from_slice(b"Content-Type: video/mp4\r\n\r\n");
    body.extend_from_slice(contents);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    router
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(
                    CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).expect("response body is not JSON")
}

pub async fn body_bytes(response: Response<Body>) -> Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}
