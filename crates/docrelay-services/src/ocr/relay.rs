use std::sync::Arc;

use docrelay_core::models::{DocumentResult, DocumentStatus, FailedResult, OcrExtractResponse};
use docrelay_core::{AppError, ValidatedUpload};
use docrelay_db::{DocumentStore, NewDocument};
use uuid::Uuid;

use super::client::{OcrClient, OcrError};

/// Runs one upload through the OCR service and records the outcome on its document.
#[derive(Clone)]
pub struct OcrRelayService {
    store: Arc<dyn DocumentStore>,
    ocr: Arc<dyn OcrClient>,
}

impl OcrRelayService {
    pub fn new(store: Arc<dyn DocumentStore>, ocr: Arc<dyn OcrClient>) -> Self {
        Self { store, ocr }
    }

    /// Create the document in `processing`, call the OCR service once, then move the
    /// document to `completed` or `failed`.
    ///
    /// OCR failures are written to the document before being returned as
    /// `AppError::Ocr`. Nothing is rolled back when a later step fails.
    #[tracing::instrument(skip(self, upload), fields(filename = %upload.filename, mime = %upload.mime, size = upload.size))]
    pub async fn extract(&self, upload: ValidatedUpload) -> Result<OcrExtractResponse, AppError> {
        let ValidatedUpload {
            filename,
            mime,
            size,
            bytes,
        } = upload;

        let document = self
            .store
            .create(NewDocument {
                filename,
                mime: mime.clone(),
                size,
                status: DocumentStatus::Processing,
            })
            .await?;

        match self.ocr.parse(bytes, &mime).await {
            Ok(response) => {
                self.store
                    .update_status(
                        document.id,
                        DocumentStatus::Completed,
                        Some(DocumentResult::Completed(response.clone())),
                    )
                    .await?;

                tracing::info!(document_id = %document.id, "OCR extraction completed");
                Ok(OcrExtractResponse::completed(document.id, response))
            }
            Err(err) => Err(self.record_failure(document.id, err).await),
        }
    }

    async fn record_failure(&self, id: Uuid, err: OcrError) -> AppError {
        let (details, status, detail) = match &err {
            OcrError::Upstream { status, body } => (
                Some(body.clone()),
                Some(*status),
                format!("OCR service returned {}: {}", status, body),
            ),
            OcrError::Transport(_) | OcrError::Decode(_) => (None, None, err.to_string()),
        };

        let failed = DocumentResult::Failed(FailedResult {
            error: err.to_string(),
            details,
        });

        if let Err(update_err) = self
            .store
            .update_status(id, DocumentStatus::Failed, Some(failed))
            .await
        {
            tracing::error!(
                document_id = %id,
                error = %update_err,
                "Failed to record OCR failure on document"
            );
        }

        tracing::warn!(document_id = %id, error = %err, "OCR extraction failed");
        AppError::Ocr { status, detail }
    }
}
