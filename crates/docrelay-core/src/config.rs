//! Configuration module
//!
//! Configuration is read from the environment (after loading a `.env` file when present)
//! and validated once at startup. `Config::from_lookup` takes any key lookup so tests can
//! build configurations without touching the process environment.

use std::env;

use crate::constants::{
    DEFAULT_DOMAIN, DEFAULT_OCR_SERVICE_URL, DEFAULT_OCR_TIMEOUT_SECS, DEFAULT_PORT,
    KNOWN_DEFAULT_DB_PASSWORD,
};

const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const HTTP_CONCURRENCY_LIMIT: usize = 10_000;

/// Console log output format
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

/// Server, database pool and runtime environment settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub domain: String,
    pub cors_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub http_concurrency_limit: usize,
    pub environment: String,
    pub log_format: LogFormat,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub base: BaseConfig,
    pub database_url: String,
    pub postgres_password: Option<String>,
    pub ocr_service_url: String,
    pub ocr_timeout_seconds: u64,
}

fn is_production_name(environment: &str) -> bool {
    let environment = environment.to_lowercase();
    environment == "production" || environment == "prod"
}

fn environment_from<F>(lookup: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup("NODE_ENV")
        .or_else(|| lookup("ENVIRONMENT"))
        .or_else(|| lookup("APP_ENV"))
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| "development".to_string())
}

/// Whether the process runs in production, read straight from the environment.
///
/// Used where no `Config` is reachable, e.g. when rendering an error response.
pub fn is_production_env() -> bool {
    is_production_name(&environment_from(&|key: &str| env::var(key).ok()))
}

impl Config {
    /// Load configuration from `.env` and the process environment, then validate it.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup, then validate it.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = environment_from(&lookup);

        let cors_origins: Vec<String> = lookup("CORS_ORIGIN")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let log_format = match lookup("LOG_FORMAT")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "json" => LogFormat::Json,
            _ => LogFormat::Compact,
        };

        let base = BaseConfig {
            server_port: match lookup("PORT") {
                Some(port) => port
                    .trim()
                    .parse()
                    .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
                None => DEFAULT_PORT,
            },
            domain: lookup("DOMAIN")
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_DOMAIN.to_string()),
            cors_origins,
            db_max_connections: lookup("DB_MAX_CONNECTIONS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: lookup("DB_TIMEOUT_SECONDS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            http_concurrency_limit: lookup("HTTP_CONCURRENCY_LIMIT")
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(HTTP_CONCURRENCY_LIMIT)
                .max(1),
            environment,
            log_format,
        };

        let config = Config {
            base,
            database_url: lookup("DATABASE_URL")
                .filter(|s| !s.is_empty())
                .ok_or_else(|| {
                    anyhow::anyhow!("Required environment variable missing: DATABASE_URL")
                })?,
            postgres_password: lookup("POSTGRES_PASSWORD").filter(|s| !s.is_empty()),
            ocr_service_url: lookup("OCR_SERVICE_URL")
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_OCR_SERVICE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            ocr_timeout_seconds: match lookup("OCR_TIMEOUT_SECONDS") {
                Some(secs) => secs
                    .trim()
                    .parse()
                    .map_err(|_| anyhow::anyhow!("OCR_TIMEOUT_SECONDS must be a valid number"))?,
                None => DEFAULT_OCR_TIMEOUT_SECS,
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !(self.database_url.starts_with("postgres://")
            || self.database_url.starts_with("postgresql://"))
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if !(self.ocr_service_url.starts_with("http://")
            || self.ocr_service_url.starts_with("https://"))
        {
            return Err(anyhow::anyhow!(
                "OCR_SERVICE_URL must be an http(s) URL"
            ));
        }

        if self.ocr_timeout_seconds == 0 {
            return Err(anyhow::anyhow!("OCR_TIMEOUT_SECONDS cannot be 0"));
        }

        if self.is_production() {
            let password = self.postgres_password.as_deref().ok_or_else(|| {
                anyhow::anyhow!("Required environment variable missing: POSTGRES_PASSWORD")
            })?;

            let embedded_default = self
                .database_url
                .contains(&format!(":{}@", KNOWN_DEFAULT_DB_PASSWORD));
            if password == KNOWN_DEFAULT_DB_PASSWORD || embedded_default {
                return Err(anyhow::anyhow!(
                    "Using the default database password in production; set POSTGRES_PASSWORD to a strong password"
                ));
            }
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_name(&self.base.environment)
    }

    pub fn server_port(&self) -> u16 {
        self.base.server_port
    }

    pub fn domain(&self) -> &str {
        &self.base.domain
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.base.cors_origins
    }

    pub fn db_max_connections(&self) -> u32 {
        self.base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.base.db_timeout_seconds
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.base.http_concurrency_limit
    }

    pub fn environment(&self) -> &str {
        &self.base.environment
    }

    pub fn log_format(&self) -> LogFormat {
        self.base.log_format
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn ocr_service_url(&self) -> &str {
        &self.ocr_service_url
    }

    pub fn ocr_timeout_seconds(&self) -> u64 {
        self.ocr_timeout_seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const DB_URL: &str = "postgresql://bookai:secret@db:5432/bookai";

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[("DATABASE_URL", DB_URL)])).unwrap();
        assert_eq!(config.server_port(), 8080);
        assert_eq!(config.ocr_service_url(), "http://ocr:8000");
        assert_eq!(config.ocr_timeout_seconds(), 60);
        assert_eq!(config.cors_origins(), &["*".to_string()]);
        assert_eq!(config.environment(), "development");
        assert_eq!(config.http_concurrency_limit(), 10_000);
        assert_eq!(config.log_format(), LogFormat::Compact);
        assert!(!config.is_production());
    }

    #[test]
    fn test_database_url_required() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));

        let err =
            Config::from_lookup(lookup_from(&[("DATABASE_URL", "mysql://x@y/z")])).unwrap_err();
        assert!(err.to_string().contains("PostgreSQL"));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", DB_URL),
            ("PORT", "9090"),
            ("DOMAIN", "ocr.example.com"),
            ("OCR_SERVICE_URL", "http://ocr.internal:8000/"),
            ("OCR_TIMEOUT_SECONDS", "15"),
            ("CORS_ORIGIN", "https://a.example.com, https://b.example.com"),
            ("LOG_FORMAT", "JSON"),
        ]))
        .unwrap();
        assert_eq!(config.server_port(), 9090);
        assert_eq!(config.domain(), "ocr.example.com");
        assert_eq!(config.ocr_service_url(), "http://ocr.internal:8000");
        assert_eq!(config.ocr_timeout_seconds(), 15);
        assert_eq!(
            config.cors_origins(),
            &[
                "https://a.example.com".to_string(),
                "https://b.example.com".to_string()
            ]
        );
        assert_eq!(config.log_format(), LogFormat::Json);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[("DATABASE_URL", DB_URL), ("PORT", "http")]))
            .unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_zero_ocr_timeout_is_rejected() {
        assert!(Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", DB_URL),
            ("OCR_TIMEOUT_SECONDS", "0"),
        ]))
        .is_err());
    }

    #[test]
    fn test_production_requires_postgres_password() {
        let err = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", DB_URL),
            ("NODE_ENV", "production"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("POSTGRES_PASSWORD"));
    }

    #[test]
    fn test_production_rejects_default_password() {
        let err = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", DB_URL),
            ("NODE_ENV", "production"),
            ("POSTGRES_PASSWORD", "bookai_password"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("default database password"));

        let err = Config::from_lookup(lookup_from(&[
            (
                "DATABASE_URL",
                "postgresql://bookai:bookai_password@db:5432/bookai",
            ),
            ("ENVIRONMENT", "prod"),
            ("POSTGRES_PASSWORD", "something-else"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("default database password"));
    }

    #[test]
    fn test_default_password_allowed_outside_production() {
        let config = Config::from_lookup(lookup_from(&[
            (
                "DATABASE_URL",
                "postgresql://bookai:bookai_password@db:5432/bookai",
            ),
            ("POSTGRES_PASSWORD", "bookai_password"),
        ]))
        .unwrap();
        assert!(!config.is_production());
    }

    #[test]
    fn test_production_with_strong_password() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", DB_URL),
            ("NODE_ENV", "Production"),
            ("POSTGRES_PASSWORD", "secret"),
        ]))
        .unwrap();
        assert!(config.is_production());
    }
}
