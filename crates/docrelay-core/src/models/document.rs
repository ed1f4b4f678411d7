use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::AppError;

/// Lifecycle of a document upload.
///
/// `pending -> processing -> {completed | failed}`. The relay creates records directly in
/// `processing`; `completed` and `failed` are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "text", rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Pending => "pending",
            DocumentStatus::Processing => "processing",
            DocumentStatus::Completed => "completed",
            DocumentStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, DocumentStatus::Completed | DocumentStatus::Failed)
    }

    /// Statuses a document must currently be in to move to `self`.
    pub fn predecessors(&self) -> &'static [DocumentStatus] {
        match self {
            DocumentStatus::Pending => &[],
            DocumentStatus::Processing => &[DocumentStatus::Pending],
            DocumentStatus::Completed | DocumentStatus::Failed => &[DocumentStatus::Processing],
        }
    }

    pub fn can_transition_to(&self, next: DocumentStatus) -> bool {
        next.predecessors().contains(self)
    }

    /// Check that `result` is the payload this status is allowed to carry:
    /// nothing before a terminal state, the matching variant after.
    pub fn check_result(&self, result: Option<&DocumentResult>) -> Result<(), AppError> {
        let ok = match (self, result) {
            (DocumentStatus::Pending | DocumentStatus::Processing, None) => true,
            (DocumentStatus::Completed, Some(DocumentResult::Completed(_))) => true,
            (DocumentStatus::Failed, Some(DocumentResult::Failed(_))) => true,
            _ => false,
        };
        if ok {
            Ok(())
        } else {
            Err(AppError::Validation(format!(
                "result payload does not match status '{}'",
                self
            )))
        }
    }
}

impl Display for DocumentStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(DocumentStatus::Pending),
            "processing" => Ok(DocumentStatus::Processing),
            "completed" => Ok(DocumentStatus::Completed),
            "failed" => Ok(DocumentStatus::Failed),
            _ => Err(anyhow::anyhow!("Invalid document status: {}", s)),
        }
    }
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

fn null_as_empty_object<'de, D>(deserializer: D) -> Result<Value, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(if value.is_null() { empty_object() } else { value })
}

/// OCR output recorded on a completed document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedResult {
    #[serde(default = "empty_object", deserialize_with = "null_as_empty_object")]
    pub fields: Value,
    #[serde(default = "empty_object", deserialize_with = "null_as_empty_object")]
    pub confidence: Value,
    #[serde(default = "empty_object", deserialize_with = "null_as_empty_object")]
    pub raw: Value,
}

impl Default for CompletedResult {
    fn default() -> Self {
        Self {
            fields: empty_object(),
            confidence: empty_object(),
            raw: empty_object(),
        }
    }
}

impl CompletedResult {
    /// Build from an OCR response body. Missing or null members become `{}`; a body that
    /// is not a JSON object yields all defaults.
    pub fn from_response_body(body: Value) -> Self {
        let Value::Object(mut members) = body else {
            return Self::default();
        };
        let mut take = |key: &str| match members.remove(key) {
            Some(Value::Null) | None => empty_object(),
            Some(value) => value,
        };
        Self {
            fields: take("fields"),
            confidence: take("confidence"),
            raw: take("raw"),
        }
    }
}

/// Failure detail recorded on a failed document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedResult {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Terminal payload of a document; the variant always matches the document status.
///
/// Stored untagged so the persisted JSON is exactly `{fields, confidence, raw}` or
/// `{error, details}`. `Failed` is tried first because every `CompletedResult` member
/// has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentResult {
    Failed(FailedResult),
    Completed(CompletedResult),
}

impl DocumentResult {
    pub fn status(&self) -> DocumentStatus {
        match self {
            DocumentResult::Completed(_) => DocumentStatus::Completed,
            DocumentResult::Failed(_) => DocumentStatus::Failed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub filename: String,
    pub mime: String,
    pub size: i64,
    pub status: DocumentStatus,
    pub result: Option<DocumentResult>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full document record as returned by `GET /documents/{id}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResponse {
    pub id: Uuid,
    pub filename: String,
    pub mime: String,
    pub size: i64,
    pub status: DocumentStatus,
    #[schema(value_type = Option<Object>)]
    pub result: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Document> for DocumentResponse {
    fn from(doc: Document) -> Self {
        // Serializing our own result types cannot fail: they hold only strings and Values.
        let result = doc
            .result
            .and_then(|result| serde_json::to_value(result).ok());
        DocumentResponse {
            id: doc.id,
            filename: doc.filename,
            mime: doc.mime,
            size: doc.size,
            status: doc.status,
            result,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

/// List entry; the result payload is left out of listings.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub id: Uuid,
    pub filename: String,
    pub mime: String,
    pub size: i64,
    pub status: DocumentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Document> for DocumentSummary {
    fn from(doc: Document) -> Self {
        DocumentSummary {
            id: doc.id,
            filename: doc.filename,
            mime: doc.mime,
            size: doc.size,
            status: doc.status,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DocumentListResponse {
    pub documents: Vec<DocumentSummary>,
    pub count: usize,
}

impl From<Vec<Document>> for DocumentListResponse {
    fn from(documents: Vec<Document>) -> Self {
        let documents: Vec<DocumentSummary> =
            documents.into_iter().map(DocumentSummary::from).collect();
        DocumentListResponse {
            count: documents.len(),
            documents,
        }
    }
}
