//! Common test utilities for E2E testing.
//!
//! Builds an in-process server over a JSON catalog in a temp directory,
//! with a recording notifier in place of the webhook.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use anihub_core::testing::RecordingNotifier;
use anihub_core::{
    create_event_loop, Catalog, CatalogEntry, CatalogStore, Dispatcher, JsonFileStore,
};
use anihub_server::{api::create_router, state::AppState};

/// Re-export fixtures for test convenience
pub use anihub_core::testing::fixtures;

/// Test fixture for E2E testing.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_catalog() {
///     let fixture = TestFixture::new().await;
///     let response = fixture.get("/api/v1/catalog").await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Notifications sent to the operator
    pub notifier: Arc<RecordingNotifier>,
    /// Catalog document on disk
    pub catalog_path: PathBuf,
    /// Keeps the catalog directory alive
    pub temp_dir: TempDir,
    api_key: Option<String>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Configuration for test fixture.
#[derive(Debug, Clone, Default)]
pub struct TestConfig {
    /// Require this API key on protected routes
    pub api_key: Option<String>,
    /// Catalog contents before the server starts
    pub entries: Vec<CatalogEntry>,
}

impl TestFixture {
    /// Create a new test fixture with an empty catalog.
    pub async fn new() -> Self {
        Self::with_config(TestConfig::default()).await
    }

    /// Create a test fixture seeded with catalog entries.
    pub async fn with_entries(entries: Vec<CatalogEntry>) -> Self {
        Self::with_config(TestConfig {
            entries,
            ..Default::default()
        })
        .await
    }

    /// Create a test fixture with custom configuration.
    pub async fn with_config(test_config: TestConfig) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let catalog_path = temp_dir.path().join("anime_list.json");

        let mut config = fixtures::config();
        config.storage.path = catalog_path.clone();
        config.server.api_key = test_config.api_key.clone();

        let store = Arc::new(JsonFileStore::new(&catalog_path));
        if !test_config.entries.is_empty() {
            store
                .save(&test_config.entries)
                .expect("Failed to seed catalog");
        }

        let catalog = Arc::new(Catalog::new(store));
        let notifier = Arc::new(RecordingNotifier::new());
        let dispatcher = Dispatcher::new(&config, Arc::clone(&catalog), notifier.clone())
            .expect("Failed to create dispatcher");

        let (events, event_loop) = create_event_loop(dispatcher, 64, Duration::from_secs(60));
        tokio::spawn(event_loop.run());

        let state = Arc::new(AppState::new(config, events, catalog));
        let router = create_router(state);

        Self {
            router,
            notifier,
            catalog_path,
            temp_dir,
            api_key: test_config.api_key,
        }
    }

    /// Catalog document as currently stored on disk.
    pub fn stored_catalog(&self) -> Value {
        let bytes = std::fs::read(&self.catalog_path).expect("Failed to read catalog");
        serde_json::from_slice(&bytes).expect("Catalog is not valid JSON")
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None, self.api_key.as_deref()).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body), self.api_key.as_deref())
            .await
    }

    /// Send a GET request with an explicit API key (or none).
    pub async fn get_with_key(&self, path: &str, key: Option<&str>) -> TestResponse {
        self.request("GET", path, None, key).await
    }

    /// Send an operator chat message and return the reply texts.
    pub async fn say(&self, text: &str) -> Vec<String> {
        let response = self
            .post(
                "/api/v1/events",
                serde_json::json!({
                    "type": "operator_message",
                    "sender_id": fixtures::OPERATOR_ID,
                    "text": text,
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "body: {}", response.body);

        response.body["messages"]
            .as_array()
            .map(|messages| {
                messages
                    .iter()
                    .filter_map(|m| m["text"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Send a request to the test server.
    async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        api_key: Option<&str>,
    ) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        if let Some(key) = api_key {
            request_builder = request_builder.header("Authorization", format!("Bearer {}", key));
        }

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        let request = request_builder.body(body).unwrap();

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

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}
