//! Upload intake validation.
//!
//! Checks run in the order a client would hit them: content type (known from the part
//! header before the body is read), size, then filename and size bounds. No side effects.

use bytes::Bytes;
use validator::Validate;

use crate::constants::{ALLOWED_MIME_TYPES, MAX_FILE_SIZE_BYTES, MAX_FILENAME_CHARS};
use crate::AppError;

/// A file that passed intake and may be persisted and relayed.
#[derive(Debug, Clone)]
pub struct ValidatedUpload {
    pub filename: String,
    pub mime: String,
    pub size: i64,
    pub bytes: Bytes,
}

#[derive(Debug, Validate)]
struct UploadMetadata {
    #[validate(length(min = 1, max = MAX_FILENAME_CHARS))]
    filename: String,
    #[validate(range(min = 1))]
    size: i64,
}

/// Strip MIME parameters and lowercase ("Image/JPEG; q=1" -> "image/jpeg").
pub fn normalize_mime_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .map(str::trim)
        .unwrap_or(content_type)
        .to_lowercase()
}

/// Validate a declared content type against the allow-list, returning its normalized form.
pub fn validate_mime_type(content_type: &str) -> Result<String, AppError> {
    let normalized = normalize_mime_type(content_type);
    if ALLOWED_MIME_TYPES.contains(&normalized.as_str()) {
        Ok(normalized)
    } else {
        Err(AppError::InvalidFileType {
            mime: content_type.to_string(),
        })
    }
}

/// Validate a complete upload.
pub fn validate_upload(
    filename: &str,
    content_type: &str,
    bytes: Bytes,
) -> Result<ValidatedUpload, AppError> {
    let mime = validate_mime_type(content_type)?;

    if bytes.len() > MAX_FILE_SIZE_BYTES {
        return Err(AppError::FileTooLarge {
            size: bytes.len(),
            max: MAX_FILE_SIZE_BYTES,
        });
    }

    let size = i64::try_from(bytes.len())
        .map_err(|_| AppError::Validation("size: out of range".to_string()))?;
    let metadata = UploadMetadata {
        filename: filename.to_string(),
        size,
    };
    metadata.validate()?;

    Ok(ValidatedUpload {
        filename: metadata.filename,
        mime,
        size,
        bytes,
    })
}
