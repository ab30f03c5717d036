use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value as Json;
use std::sync::Arc;
use tower::util::ServiceExt;

use crate::{
    config::{Config, FirebaseConfig, StoreBackend},
    create_app,
    errors::StoreError,
    facade::DbUtil,
    store::{Document, DocumentStore, Fields, MemoryStore},
    AppState,
};

pub fn test_config() -> Config {
    Config {
        server_address: "127.0.0.1:0".to_string(),
        static_dir: "./test-public".to_string(),
        store_backend: StoreBackend::Memory,
        firebase: FirebaseConfig::new("test-project", "test-key"),
    }
}

/// App and facade over one shared in-memory store
pub struct TestContext {
    pub app: Router,
    pub db: DbUtil,
    pub store: Arc<MemoryStore>,
}

impl TestContext {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let db = DbUtil::new(store.clone());
        let app = create_app(Arc::new(AppState {
            db: db.clone(),
            config: test_config(),
        }));
        Self { app, db, store }
    }

    pub async fn request(&self, method: &str, uri: &str, body: Option<Json>) -> (StatusCode, Json) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(serde_json::to_vec(&json).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Json::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Json::Null)
        };
        (status, json)
    }
}

/// Store that rejects every call the way a locked-down database would
pub struct DenyingStore;

impl DenyingStore {
    fn denied() -> StoreError {
        StoreError::Remote {
            status: 403,
            code: "PERMISSION_DENIED".to_string(),
            message: "Missing or insufficient permissions.".to_string(),
        }
    }
}

#[async_trait]
impl DocumentStore for DenyingStore {
    fn name(&self) -> &'static str {
        "denying"
    }

    async fn set_merge(&self, _: &str, _: &str, _: Fields) -> Result<(), StoreError> {
        Err(Self::denied())
    }

    async fn update(&self, _: &str, _: &str, _: Fields) -> Result<(), StoreError> {
        Err(Self::denied())
    }

    async fn add(&self, _: &str, _: Fields) -> Result<String, StoreError> {
        Err(Self::denied())
    }

    async fn get(&self, _: &str, _: &str) -> Result<Option<Document>, StoreError> {
        Err(Self::denied())
    }

    async fn list(&self, _: &str) -> Result<Vec<Document>, StoreError> {
        Err(Self::denied())
    }
}
