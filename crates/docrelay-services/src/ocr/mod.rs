//! OCR relay
//!
//! `client` talks to the external OCR service; `relay` drives one upload through create,
//! parse and the terminal status update.

pub mod client;
pub mod relay;

pub use client::{HttpOcrClient, OcrClient, OcrError, OcrResponse};
pub use relay::OcrRelayService;
