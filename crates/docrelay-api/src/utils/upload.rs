//! Multipart intake for the OCR upload endpoint

use axum::extract::multipart::{Field, MultipartError, MultipartRejection};
use axum::extract::Multipart;
use axum::http::{header::CONTENT_TYPE, HeaderMap, StatusCode};
use bytes::{Bytes, BytesMut};
use docrelay_core::constants::MAX_FILE_SIZE_BYTES;
use docrelay_core::validation::{validate_mime_type, validate_upload, ValidatedUpload};
use docrelay_core::AppError;

/// Multipart field carrying the document.
pub const FILE_FIELD: &str = "file";

/// Room for multipart boundaries and part headers on top of the file itself.
pub const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

fn multipart_error(err: MultipartError, received: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::FileTooLarge {
            size: received.max(MAX_FILE_SIZE_BYTES + 1),
            max: MAX_FILE_SIZE_BYTES,
        }
    } else {
        AppError::Upload(err.body_text())
    }
}

fn is_multipart_form(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| {
            value
                .trim_start()
                .to_ascii_lowercase()
                .starts_with("multipart/form-data")
        })
        .unwrap_or(false)
}

/// Map a failed `Multipart` extraction: a request that is not a form upload carries no
/// file, a form with a broken boundary is an upload error.
pub fn multipart_rejection(headers: &HeaderMap, rejection: MultipartRejection) -> AppError {
    if is_multipart_form(headers) {
        AppError::Upload(rejection.body_text())
    } else {
        AppError::NoFile
    }
}

/// Read one file part, refusing to buffer more than the size limit.
async fn read_file_field(mut field: Field<'_>) -> Result<Bytes, AppError> {
    let mut buffer = BytesMut::new();
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| multipart_error(e, buffer.len()))?
    {
        if buffer.len() + chunk.len() > MAX_FILE_SIZE_BYTES {
            return Err(AppError::FileTooLarge {
                size: buffer.len() + chunk.len(),
                max: MAX_FILE_SIZE_BYTES,
            });
        }
        buffer.extend_from_slice(&chunk);
    }
    Ok(buffer.freeze())
}

/// Extract and validate the single `file` part of an upload.
///
/// The declared content type is checked before the body is read; other fields are
/// ignored. A second `file` part is rejected.
pub async fn extract_upload(mut multipart: Multipart) -> Result<ValidatedUpload, AppError> {
    let mut upload: Option<ValidatedUpload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, 0))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        if upload.is_some() {
            return Err(AppError::TooManyFiles);
        }

        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        validate_mime_type(&content_type)?;

        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = read_file_field(field).await?;

        upload = Some(validate_upload(&filename, &content_type, bytes)?);
    }

    upload.ok_or(AppError::NoFile)
}
