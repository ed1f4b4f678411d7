//! Application setup and initialization
//!
//! Everything `main` needs to go from a loaded `Config` to a served router.

pub mod database;
pub mod routes;
pub mod server;
pub mod validation;

use crate::state::AppState;
use anyhow::{Context, Result};
use docrelay_core::constants::SERVICE_NAME;
use docrelay_core::Config;
use docrelay_db::{DocumentRepository, DocumentStore};
use docrelay_services::{HttpOcrClient, OcrClient};
use std::sync::Arc;
use std::time::Duration;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    docrelay_infra::init_telemetry(SERVICE_NAME, config.environment(), config.log_format())
        .context("Failed to initialize telemetry")?;

    validation::validate_config(&config).context("Configuration validation failed")?;
    tracing::info!("Configuration loaded and validated successfully");

    let pool = database::setup_database(&config).await?;
    let store: Arc<dyn DocumentStore> = Arc::new(DocumentRepository::new(pool));

    let ocr: Arc<dyn OcrClient> = Arc::new(HttpOcrClient::new(
        config.ocr_service_url(),
        Duration::from_secs(config.ocr_timeout_seconds()),
    )?);
    tracing::info!(
        ocr_service_url = %config.ocr_service_url(),
        ocr_timeout_seconds = config.ocr_timeout_seconds(),
        "OCR client configured"
    );

    let state = Arc::new(AppState::new(config.clone(), store, ocr));
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
