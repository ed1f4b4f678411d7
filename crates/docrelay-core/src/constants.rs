//! Application constants
//!
//! Static upload allow-list, size limits and listing bounds shared by the intake,
//! store and HTTP layers.

/// Content types accepted by the OCR upload endpoint.
pub const ALLOWED_MIME_TYPES: [&str; 6] = [
    "application/pdf",
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/webp",
    "image/heic",
];

/// Maximum accepted upload size (20 MiB).
pub const MAX_FILE_SIZE_BYTES: usize = 20 * 1024 * 1024;

/// Maximum filename length, counted in characters.
pub const MAX_FILENAME_CHARS: u64 = 255;

pub const DEFAULT_LIST_LIMIT: i64 = 10;
pub const MAX_LIST_LIMIT: i64 = 100;

pub const DEFAULT_OCR_SERVICE_URL: &str = "http://ocr:8000";
pub const DEFAULT_OCR_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DOMAIN: &str = "localhost";

/// Name reported by the health endpoint.
pub const SERVICE_NAME: &str = "api";

/// Database password shipped in the sample compose file; refused in production.
pub const KNOWN_DEFAULT_DB_PASSWORD: &str = "bookai_password";

/// Normalize a requested list size: missing or non-positive values fall back to the
/// default, anything above the cap is clamped.
pub fn clamp_list_limit(requested: Option<i64>) -> i64 {
    match requested {
        Some(limit) if limit > 0 => limit.min(MAX_LIST_LIMIT),
        _ => DEFAULT_LIST_LIMIT,
    }
}
