//! Data models for the application

mod document;
mod ocr;

pub use document::*;
pub use ocr::*;
