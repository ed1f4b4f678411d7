//! OpenAPI documentation, served at `/api/openapi.json` and rendered by RapiDoc at `/docs`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use docrelay_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "DocRelay API",
        version = "0.1.0",
        description = "Document upload API: validates uploads, relays them to the OCR service and records every outcome on a document record."
    ),
    paths(
        handlers::document_get::get_document,
        handlers::document_get::list_documents,
        handlers::ocr_extract::extract_document,
    ),
    components(
        schemas(
            models::DocumentStatus,
            models::DocumentResponse,
            models::DocumentSummary,
            models::DocumentListResponse,
            models::OcrExtractResponse,
            handlers::ocr_extract::OcrExtractForm,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "documents", description = "Document records and their OCR outcome"),
        (name = "ocr", description = "Upload a document for OCR extraction")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/documents/{id}"));
        assert!(doc.paths.paths.contains_key("/documents"));
        assert!(doc.paths.paths.contains_key("/ocr/extract"));
    }
}
