//! Route configuration and setup.
//!
//! Health checks live in [health](health).

mod health;

use crate::api_doc::ApiDoc;
use crate::error::route_not_found;
use crate::handlers::{document_get, ocr_extract};
use crate::state::AppState;
use crate::utils::upload::MULTIPART_OVERHEAD_BYTES;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use docrelay_core::constants::MAX_FILE_SIZE_BYTES;
use docrelay_core::Config;
use docrelay_infra::request_id_middleware;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    let upload_limit = MAX_FILE_SIZE_BYTES + MULTIPART_OVERHEAD_BYTES;

    let app = Router::new()
        .route("/health", get(health::health_check))
        .route("/documents", get(document_get::list_documents))
        .route("/documents/{id}", get(document_get::get_document))
        .route(
            "/ocr/extract",
            post(ocr_extract::extract_document).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/api/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .merge(RapiDoc::new("/api/openapi.json").path("/docs"))
        .fallback(route_not_found)
        .layer(ConcurrencyLimitLayer::new(config.http_concurrency_limit()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state);

    tracing::info!(
        upload_limit_bytes = upload_limit,
        http_concurrency_limit = config.http_concurrency_limit(),
        "Routes configured"
    );

    Ok(app)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::OPTIONS];

    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|_| anyhow::anyhow!("Invalid CORS origin: {}", o))
            })
            .collect::<Result<Vec<_>, _>>()?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}
