use async_trait::async_trait;
use chrono::{DateTime, Utc};
use docrelay_core::constants::clamp_list_limit;
use docrelay_core::models::{Document, DocumentResult, DocumentStatus};
use docrelay_core::AppError;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres};
use uuid::Uuid;

const DOCUMENT_COLUMNS: &str =
    "id, filename, mime, size, status, result, created_at, updated_at";

/// Metadata for a document about to be recorded.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub filename: String,
    pub mime: String,
    pub size: i64,
    pub status: DocumentStatus,
}

impl NewDocument {
    /// Reject statuses a fresh record may not start in.
    pub fn check(&self) -> Result<(), AppError> {
        if self.status.is_terminal() {
            return Err(AppError::Validation(format!(
                "documents cannot be created in terminal status '{}'",
                self.status
            )));
        }
        Ok(())
    }
}

/// Persistence contract for document records.
///
/// Handlers and services receive it as `Arc<dyn DocumentStore>`, so Postgres and the
/// in-memory store are interchangeable.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a record with a fresh id, matching timestamps and no result.
    async fn create(&self, document: NewDocument) -> Result<Document, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Document>, AppError>;

    /// Move a record to `status`, storing `result`. Fails with `DocumentNotFound` for
    /// unknown ids and `InvalidTransition` when the stored status may not move there.
    async fn update_status(
        &self,
        id: Uuid,
        status: DocumentStatus,
        result: Option<DocumentResult>,
    ) -> Result<Document, AppError>;

    /// Most recently created records first. `limit` is clamped to `1..=100`.
    async fn list_recent(&self, limit: i64) -> Result<Vec<Document>, AppError>;

    /// Cheap round trip used by health reporting.
    async fn ping(&self) -> Result<(), AppError>;
}

#[derive(Debug, FromRow)]
struct DocumentRow {
    id: Uuid,
    filename: String,
    mime: String,
    size: i64,
    status: String,
    result: Option<Json<DocumentResult>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<DocumentRow> for Document {
    type Error = AppError;

    fn try_from(row: DocumentRow) -> Result<Self, Self::Error> {
        Ok(Document {
            id: row.id,
            filename: row.filename,
            mime: row.mime,
            size: row.size,
            status: row.status.parse()?,
            result: row.result.map(|json| json.0),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Postgres-backed document store
#[derive(Clone)]
pub struct DocumentRepository {
    pool: PgPool,
}

impl DocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn current_status(&self, id: Uuid) -> Result<Option<DocumentStatus>, AppError> {
        let status =
            sqlx::query_scalar::<Postgres, String>("SELECT status FROM documents WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        status.map(|s| s.parse().map_err(AppError::from)).transpose()
    }
}

#[async_trait]
impl DocumentStore for DocumentRepository {
    #[tracing::instrument(skip(self, document), fields(db.table = "documents", db.operation = "insert"))]
    async fn create(&self, document: NewDocument) -> Result<Document, AppError> {
        document.check()?;

        let row = sqlx::query_as::<Postgres, DocumentRow>(&format!(
            r#"
            INSERT INTO documents (id, filename, mime, size, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            DOCUMENT_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&document.filename)
        .bind(&document.mime)
        .bind(document.size)
        .bind(document.status.as_str())
        .fetch_one(&self.pool)
        .await?;

        let created = Document::try_from(row)?;
        tracing::debug!(document_id = %created.id, status = %created.status, "Document created");
        Ok(created)
    }

    #[tracing::instrument(skip(self), fields(db.table = "documents", db.operation = "select", db.record_id = %id))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Document>, AppError> {
        let row = sqlx::query_as::<Postgres, DocumentRow>(&format!(
            "SELECT {} FROM documents WHERE id = $1",
            DOCUMENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Document::try_from).transpose()
    }

    #[tracing::instrument(skip(self, result), fields(db.table = "documents", db.operation = "update", db.record_id = %id))]
    async fn update_status(
        &self,
        id: Uuid,
        status: DocumentStatus,
        result: Option<DocumentResult>,
    ) -> Result<Document, AppError> {
        status.check_result(result.as_ref())?;

        let allowed_from: Vec<&str> = status.predecessors().iter().map(|s| s.as_str()).collect();

        // The status guard sits in the WHERE clause so concurrent updates cannot both win.
        let row = sqlx::query_as::<Postgres, DocumentRow>(&format!(
            r#"
            UPDATE documents
            SET status = $2, result = $3, updated_at = NOW()
            WHERE id = $1 AND status = ANY($4)
            RETURNING {}
            "#,
            DOCUMENT_COLUMNS
        ))
        .bind(id)
        .bind(status.as_str())
        .bind(result.as_ref().map(Json))
        .bind(&allowed_from)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Document::try_from(row),
            None => match self.current_status(id).await? {
                Some(from) => Err(AppError::InvalidTransition { from, to: status }),
                None => Err(AppError::DocumentNotFound(id)),
            },
        }
    }

    #[tracing::instrument(skip(self), fields(db.table = "documents", db.operation = "select"))]
    async fn list_recent(&self, limit: i64) -> Result<Vec<Document>, AppError> {
        let rows = sqlx::query_as::<Postgres, DocumentRow>(&format!(
            "SELECT {} FROM documents ORDER BY created_at DESC, id DESC LIMIT $1",
            DOCUMENT_COLUMNS
        ))
        .bind(clamp_list_limit(Some(limit)))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Document::try_from).collect()
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query_scalar::<Postgres, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }
}
