//! HTTP error response body
//!
//! The `IntoResponse` implementation for `AppError` lives in docrelay-api because of the
//! orphan rule; this crate only owns the serialized shape.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standard error response format for HTTP APIs
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable message
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Stable machine-readable code, e.g. `INVALID_FILE_TYPE`
    pub code: String,
    pub recoverable: bool,
}
