use async_trait::async_trait;
use chrono::Utc;
use docrelay_core::constants::clamp_list_limit;
use docrelay_core::models::{Document, DocumentResult, DocumentStatus};
use docrelay_core::AppError;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::document::{DocumentStore, NewDocument};

/// Document store kept in process memory.
///
/// Records live in insertion order behind a single lock; nothing is persisted.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    documents: RwLock<Vec<Document>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn create(&self, document: NewDocument) -> Result<Document, AppError> {
        document.check()?;

        let now = Utc::now();
        let created = Document {
            id: Uuid::new_v4(),
            filename: document.filename,
            mime: document.mime,
            size: document.size,
            status: document.status,
            result: None,
            created_at: now,
            updated_at: now,
        };

        self.documents.write().await.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Document>, AppError> {
        let documents = self.documents.read().await;
        Ok(documents.iter().find(|d| d.id == id).cloned())
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: DocumentStatus,
        result: Option<DocumentResult>,
    ) -> Result<Document, AppError> {
        status.check_result(result.as_ref())?;

        let mut documents = self.documents.write().await;
        let document = documents
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(AppError::DocumentNotFound(id))?;

        if !document.status.can_transition_to(status) {
            return Err(AppError::InvalidTransition {
                from: document.status,
                to: status,
            });
        }

        document.status = status;
        document.result = result;
        document.updated_at = Utc::now().max(document.created_at);
        Ok(document.clone())
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<Document>, AppError> {
        let limit = usize::try_from(clamp_list_limit(Some(limit))).unwrap_or(usize::MAX);
        let documents = self.documents.read().await;

        // Newest insert first, so equal timestamps still list in reverse insertion order.
        let mut recent: Vec<Document> = documents.iter().rev().cloned().collect();
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent.truncate(limit);
        Ok(recent)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
