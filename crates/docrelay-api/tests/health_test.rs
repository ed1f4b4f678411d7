//! Health endpoint integration tests.

mod helpers;

use async_trait::async_trait;
use docrelay_core::models::{Document, DocumentResult, DocumentStatus};
use docrelay_core::AppError;
use docrelay_db::{DocumentStore, InMemoryDocumentStore, NewDocument};
use helpers::{build_server, setup_test_app, TEST_DOMAIN};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

/// Store whose database probe always fails.
struct UnreachableStore {
    inner: InMemoryDocumentStore,
}

#[async_trait]
impl DocumentStore for UnreachableStore {
    async fn create(&self, document: NewDocument) -> Result<Document, AppError> {
        self.inner.create(document).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Document>, AppError> {
        self.inner.find_by_id(id).await
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: DocumentStatus,
        result: Option<DocumentResult>,
    ) -> Result<Document, AppError> {
        self.inner.update_status(id, status, result).await
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<Document>, AppError> {
        self.inner.list_recent(limit).await
    }

    async fn ping(&self) -> Result<(), AppError> {
        Err(AppError::Internal("connection refused".to_string()))
    }
}

#[tokio::test]
async fn test_health_reports_connected_database() {
    let app = setup_test_app("http://127.0.0.1:1");

    let response = app.client().get("/health").await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["ok"], true);
    assert_eq!(body["service"], "api");
    assert_eq!(body["domain"], TEST_DOMAIN);
    assert_eq!(body["database"], "connected");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_health_reports_disconnected_database() {
    let store: Arc<dyn DocumentStore> = Arc::new(UnreachableStore {
        inner: InMemoryDocumentStore::new(),
    });
    let server = build_server("http://127.0.0.1:1", store);

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["ok"], true);
    assert_eq!(body["database"], "disconnected");
}
