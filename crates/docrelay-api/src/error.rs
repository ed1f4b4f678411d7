//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`; any `AppError` converts with
//! `?` and renders as `{error, hint?, code, recoverable}` with the variant's status code.

use axum::{
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use docrelay_core::{is_production_env, AppError, ErrorMetadata, LogLevel};
pub use docrelay_infra::ErrorResponse;

/// Wrapper type for AppError to implement IntoResponse
///
/// Needed because of the orphan rule: `IntoResponse` (axum) cannot be implemented for
/// `AppError` (docrelay-core) outside either crate.
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error.detailed_message(), error_type = error_type, "Error occurred");
        }
    }
}

/// Build the response body. Sensitive errors carry their internal detail as the hint
/// outside production only.
pub(crate) fn error_body(error: &AppError, is_production: bool) -> ErrorResponse {
    let hint = if error.is_sensitive() && !is_production {
        Some(error.detailed_message())
    } else {
        error.hint()
    };

    ErrorResponse {
        error: error.client_message(),
        hint,
        code: error.error_code().to_string(),
        recoverable: error.is_recoverable(),
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        (status, Json(error_body(app_error, is_production_env()))).into_response()
    }
}

/// Fallback for unmatched routes
pub async fn route_not_found(method: Method, uri: Uri) -> HttpAppError {
    HttpAppError(AppError::RouteNotFound {
        method: method.to_string(),
        path: uri.path().to_string(),
    })
}
