//! Error types module
//!
//! All failures in the service are expressed as the closed `AppError` enum. Each variant
//! describes its own HTTP presentation through `ErrorMetadata`, so the API boundary can
//! render any error without inspecting it ad hoc.
//!
//! The `Database` variant and `From<sqlx::Error>` are gated behind the `sqlx` feature.

use std::io;

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;
use uuid::Uuid;

use crate::constants::{ALLOWED_MIME_TYPES, MAX_FILE_SIZE_BYTES};
use crate::models::DocumentStatus;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for upstream failures outside our control
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "NOT_FOUND")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Client-facing message
    fn client_message(&self) -> String;

    /// Optional hint telling the client what went wrong or what to do next
    fn hint(&self) -> Option<String>;

    /// Whether internal details should be hidden from clients in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[cfg(not(feature = "sqlx"))]
    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("No file provided")]
    NoFile,

    #[error("File type not allowed: {mime}")]
    InvalidFileType { mime: String },

    #[error("File too large: {size} bytes exceeds max {max} bytes")]
    FileTooLarge { size: usize, max: usize },

    #[error("Too many files")]
    TooManyFiles,

    #[error("Upload error: {0}")]
    Upload(String),

    #[error("Invalid document ID: {0}")]
    InvalidId(String),

    #[error("Document not found: {0}")]
    DocumentNotFound(Uuid),

    #[error("Route not found: {method} {path}")]
    RouteNotFound { method: String, path: String },

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: DocumentStatus,
        to: DocumentStatus,
    },

    /// OCR relay failure. `status` is the upstream HTTP status when the service answered.
    #[error("OCR processing failed: {detail}")]
    Ocr { status: Option<u16>, detail: String },

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(format!("JSON error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Static metadata for each variant: (error_code, recoverable, sensitive, log_level).
fn app_error_static_metadata(err: &AppError) -> (&'static str, bool, bool, LogLevel) {
    match err {
        AppError::Database(_) => ("DATABASE_ERROR", true, true, LogLevel::Error),
        AppError::Validation(_) => ("VALIDATION_ERROR", false, false, LogLevel::Debug),
        AppError::NoFile => ("NO_FILE", false, false, LogLevel::Debug),
        AppError::InvalidFileType { .. } => ("INVALID_FILE_TYPE", false, false, LogLevel::Debug),
        AppError::FileTooLarge { .. } => ("FILE_TOO_LARGE", false, false, LogLevel::Debug),
        AppError::TooManyFiles => ("TOO_MANY_FILES", false, false, LogLevel::Debug),
        AppError::Upload(_) => ("UPLOAD_ERROR", false, false, LogLevel::Debug),
        AppError::InvalidId(_) => ("INVALID_ID", false, false, LogLevel::Debug),
        AppError::DocumentNotFound(_) => ("NOT_FOUND", false, false, LogLevel::Debug),
        AppError::RouteNotFound { .. } => ("NOT_FOUND", false, false, LogLevel::Debug),
        AppError::InvalidTransition { .. } => {
            ("INVALID_STATUS_TRANSITION", false, false, LogLevel::Warn)
        }
        AppError::Ocr { .. } => ("OCR_ERROR", true, false, LogLevel::Warn),
        AppError::Internal(_) => ("INTERNAL_ERROR", true, true, LogLevel::Error),
        AppError::InternalWithSource { .. } => ("INTERNAL_ERROR", true, true, LogLevel::Error),
    }
}

impl AppError {
    /// Get the error type name for logging
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Database(_) => "Database",
            AppError::Validation(_) => "Validation",
            AppError::NoFile => "NoFile",
            AppError::InvalidFileType { .. } => "InvalidFileType",
            AppError::FileTooLarge { .. } => "FileTooLarge",
            AppError::TooManyFiles => "TooManyFiles",
            AppError::Upload(_) => "Upload",
            AppError::InvalidId(_) => "InvalidId",
            AppError::DocumentNotFound(_) => "DocumentNotFound",
            AppError::RouteNotFound { .. } => "RouteNotFound",
            AppError::InvalidTransition { .. } => "InvalidTransition",
            AppError::Ocr { .. } => "Ocr",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        match self {
            AppError::Validation(_)
            | AppError::NoFile
            | AppError::InvalidFileType { .. }
            | AppError::FileTooLarge { .. }
            | AppError::TooManyFiles
            | AppError::Upload(_)
            | AppError::InvalidId(_) => 400,
            AppError::DocumentNotFound(_) | AppError::RouteNotFound { .. } => 404,
            AppError::InvalidTransition { .. } => 409,
            // Only error statuses are propagated; anything else from upstream is a 500.
            AppError::Ocr { status, .. } => match status {
                Some(code) if (400..=599).contains(code) => *code,
                _ => 500,
            },
            AppError::Database(_) | AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                500
            }
        }
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).0
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).1
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).3
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Database(_) => "Database operation failed".to_string(),
            AppError::Validation(_) => "File validation failed".to_string(),
            AppError::NoFile => "No file provided".to_string(),
            AppError::InvalidFileType { .. } => "File type not allowed".to_string(),
            AppError::FileTooLarge { .. } => "File too large".to_string(),
            AppError::TooManyFiles => "Too many files".to_string(),
            AppError::Upload(_) => "File upload error".to_string(),
            AppError::InvalidId(_) => "Invalid document ID".to_string(),
            AppError::DocumentNotFound(_) => "Document not found".to_string(),
            AppError::RouteNotFound { .. } => "Route not found".to_string(),
            AppError::InvalidTransition { .. } => "Document status cannot change".to_string(),
            AppError::Ocr { .. } => "OCR processing failed".to_string(),
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "Internal server error".to_string()
            }
        }
    }

    fn hint(&self) -> Option<String> {
        match self {
            AppError::Database(_) => Some("Please check your request and try again".to_string()),
            AppError::Validation(msg) => Some(msg.clone()),
            AppError::NoFile => Some("Please upload a file using the \"file\" field".to_string()),
            AppError::InvalidFileType { mime } => Some(format!(
                "File type not allowed: {}. Allowed types: {}",
                mime,
                ALLOWED_MIME_TYPES.join(", ")
            )),
            AppError::FileTooLarge { .. } => Some(format!(
                "Maximum file size is {}MB",
                MAX_FILE_SIZE_BYTES / 1024 / 1024
            )),
            AppError::TooManyFiles => Some("Please upload only one file".to_string()),
            AppError::Upload(msg) => Some(msg.clone()),
            AppError::InvalidId(_) => Some("Document ID must be a valid UUID".to_string()),
            AppError::DocumentNotFound(id) => Some(format!("No document found with ID: {}", id)),
            AppError::RouteNotFound { method, path } => {
                Some(format!("No route matches {} {}", method, path))
            }
            AppError::InvalidTransition { from, to } => Some(format!(
                "A document in status '{}' cannot move to '{}'",
                from, to
            )),
            AppError::Ocr { detail, .. } => Some(detail.clone()),
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                Some("An unexpected error occurred, please try again later".to_string())
            }
        }
    }
}
