use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::{extract_upload, multipart_rejection};
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::HeaderMap,
    response::IntoResponse,
    Json,
};
use docrelay_core::models::OcrExtractResponse;
use docrelay_core::AppError;
use std::sync::Arc;
use utoipa::ToSchema;

/// Multipart body of an extraction request
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct OcrExtractForm {
    /// PDF, JPEG, PNG, WebP or HEIC document, at most 20MB
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

#[utoipa::path(
    post,
    path = "/ocr/extract",
    tag = "ocr",
    request_body(content = OcrExtractForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Document extracted", body = OcrExtractResponse),
        (status = 400, description = "Missing, invalid or oversized file", body = ErrorResponse),
        (status = 502, description = "OCR service error status, passed through", body = ErrorResponse),
        (status = 500, description = "OCR service unreachable or internal error", body = ErrorResponse)
    )
)]
pub async fn extract_document(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    let multipart = multipart.map_err(|rejection| multipart_rejection(&headers, rejection))?;
    let upload = extract_upload(multipart).await?;

    tracing::info!(
        filename = %upload.filename,
        mime = %upload.mime,
        size = upload.size,
        "Processing OCR upload"
    );

    // Spawned: the OCR call and final status update outlive a client disconnect.
    let relay = state.ocr_relay.clone();
    let response = tokio::spawn(async move { relay.extract(upload).await })
        .await
        .map_err(|e| AppError::Internal(format!("OCR relay task failed: {}", e)))??;

    Ok(Json::<OcrExtractResponse>(response))
}
