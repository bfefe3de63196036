//! Common test utilities for end-to-end testing with mocks.
//!
//! Builds the real router on top of a pipeline whose collaborators are all
//! mocks, so requests run every stage without network access or media
//! tools.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use karaokify_core::testing::MockSuite;
use karaokify_core::{Config, KaraokePipeline};

/// Re-export fixtures for test convenience
pub use karaokify_core::testing::fixtures;

/// Test fixture for end-to-end testing with mock dependencies.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_song() {
///     let fixture = TestFixture::new().await;
///     fixture.mocks.catalog.add_track(1, fixtures::track("A", "B")).await;
///     fixture.mocks.lyrics.set_default_lyrics(fixtures::LYRICS).await;
///
///     let response = fixture.get("/api/v1/songs/1").await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mocks behind the pipeline
    pub mocks: MockSuite,
    /// Cancelled to simulate server shutdown
    pub shutdown: CancellationToken,
    /// Temporary directory holding the output directory
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    /// Raw body
    pub text: String,
    /// Body parsed as JSON, `Null` when it is not JSON
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture with isolated requests.
    pub async fn new() -> Self {
        Self::with_config(fixtures::config).await
    }

    /// Create a test fixture whose config is built from the output dir.
    pub async fn with_config(build: impl FnOnce(&Path) -> Config) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let output_dir = temp_dir.path().join("output");
        let config = build(&output_dir);

        let mocks = MockSuite::new();
        let pipeline = KaraokePipeline::new(config.clone(), mocks.components());
        let shutdown = CancellationToken::new();

        let state = Arc::new(karaokify_server::state::AppState::new(
            config,
            pipeline,
            shutdown.clone(),
        ));
        let router = karaokify_server::api::create_router(state);

        Self {
            router,
            mocks,
            shutdown,
            temp_dir,
        }
    }

    pub fn output_dir(&self) -> PathBuf {
        self.temp_dir.path().join("output")
    }

    /// Registers a playable track with lyrics.
    pub async fn add_song(&self, id: u64, artist: &str, title: &str) {
        self.mocks
            .catalog
            .add_track(id, fixtures::track(artist, title))
            .await;
        self.mocks
            .lyrics
            .add_lyrics(artist, title, fixtures::LYRICS)
            .await;
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path).await
    }

    /// Send a POST request without a body.
    pub async fn post(&self, path: &str) -> TestResponse {
        self.request("POST", path).await
    }

    /// Send a request to the test server.
    pub async fn request(&self, method: &str, path: &str) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let text = String::from_utf8_lossy(&body_bytes).into_owned();
        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, text, body }
    }
}

/// Names of the entries directly in `dir`, sorted.
pub fn list_dir(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}
