//! DocRelay Core Library
//!
//! This crate provides the domain models, error types, configuration, and upload validation
//! shared by every DocRelay component.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::{is_production_env, BaseConfig, Config, LogFormat};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use validation::ValidatedUpload;
