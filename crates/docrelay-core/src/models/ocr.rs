use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use super::document::{CompletedResult, DocumentStatus};

/// Response of `POST /ocr/extract` after the OCR service answered successfully.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OcrExtractResponse {
    pub id: Uuid,
    #[schema(value_type = Object)]
    pub fields: Value,
    #[schema(value_type = Object)]
    pub confidence_summary: Value,
    #[schema(value_type = Object)]
    pub raw: Value,
    pub status: DocumentStatus,
}

impl OcrExtractResponse {
    pub fn completed(id: Uuid, result: CompletedResult) -> Self {
        Self {
            id,
            fields: result.fields,
            confidence_summary: result.confidence,
            raw: result.raw,
            status: DocumentStatus::Completed,
        }
    }
}
