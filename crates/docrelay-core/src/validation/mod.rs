//! Validation modules

pub mod upload;

pub use upload::{normalize_mime_type, validate_mime_type, validate_upload, ValidatedUpload};
