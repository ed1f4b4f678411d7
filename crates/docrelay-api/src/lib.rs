//! DocRelay API Library
//!
//! HTTP handlers, error rendering and application setup for the document OCR relay.

mod api_doc;
mod handlers;
mod utils;

pub mod error;
pub mod setup;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
