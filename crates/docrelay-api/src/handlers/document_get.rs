use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    response::IntoResponse,
    Json,
};
use docrelay_core::constants::clamp_list_limit;
use docrelay_core::models::{DocumentListResponse, DocumentResponse};
use docrelay_core::AppError;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/documents/{id}",
    tag = "documents",
    params(
        ("id" = Uuid, Path, description = "Document ID")
    ),
    responses(
        (status = 200, description = "Document found", body = DocumentResponse),
        (status = 400, description = "Malformed document ID", body = ErrorResponse),
        (status = 404, description = "Document not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let id = Uuid::parse_str(&id).map_err(|_| AppError::InvalidId(id.clone()))?;

    let document = state
        .store
        .find_by_id(id)
        .await?
        .ok_or(AppError::DocumentNotFound(id))?;

    Ok(Json(DocumentResponse::from(document)))
}

/// Unparsable limits fall back to the default instead of failing the request.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListQuery {
    /// Number of documents to return (default 10, max 100)
    #[param(value_type = Option<i64>)]
    pub limit: Option<String>,
}

#[utoipa::path(
    get,
    path = "/documents",
    tag = "documents",
    params(ListQuery),
    responses(
        (status = 200, description = "Most recent documents, newest first", body = DocumentListResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_documents(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    // A query string that does not deserialize (e.g. `limit` repeated) means the default.
    let requested = match query {
        Ok(Query(query)) => query
            .limit
            .as_deref()
            .and_then(|s| s.trim().parse::<i64>().ok()),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Ignoring unreadable list query");
            None
        }
    };

    let documents = state
        .store
        .list_recent(clamp_list_limit(requested))
        .await?;

    Ok(Json(DocumentListResponse::from(documents)))
}
