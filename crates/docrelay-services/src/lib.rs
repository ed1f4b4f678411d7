//! DocRelay Services Layer
//!
//! Business services sitting between the HTTP handlers and the store: the OCR client and
//! the relay pipeline that records every OCR outcome on its document.

pub mod ocr;

pub use ocr::{HttpOcrClient, OcrClient, OcrError, OcrRelayService, OcrResponse};
