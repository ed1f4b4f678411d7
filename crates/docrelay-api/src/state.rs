//! Application state shared by every handler.

use std::sync::Arc;

use docrelay_core::Config;
use docrelay_db::DocumentStore;
use docrelay_services::{OcrClient, OcrRelayService};

/// Store and OCR relay handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn DocumentStore>,
    pub ocr_relay: OcrRelayService,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn DocumentStore>, ocr: Arc<dyn OcrClient>) -> Self {
        let ocr_relay = OcrRelayService::new(store.clone(), ocr);
        Self {
            config,
            store,
            ocr_relay,
        }
    }
}
