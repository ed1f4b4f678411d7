//! DocRelay Infrastructure Library
//!
//! Shared infrastructure for the DocRelay services:
//! - Middleware (request ID)
//! - Telemetry initialization
//! - The JSON error body returned by every failing endpoint

pub mod error;
pub mod middleware;
pub mod telemetry;

// Re-export commonly used types
pub use error::ErrorResponse;
pub use middleware::{request_id_middleware, RequestId, REQUEST_ID_HEADER};
pub use telemetry::{init_telemetry, shutdown_telemetry};
