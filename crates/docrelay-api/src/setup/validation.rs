//! Startup checks that sit on top of `Config::validate`.

use anyhow::Result;
use docrelay_core::Config;

/// Validate settings that only matter once the server is about to run
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    if config.is_production() && config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!(
            "CORS allows all origins (*) in production; set CORS_ORIGIN to the dashboard origin"
        );
    }

    if config.db_max_connections() == 0 {
        return Err(anyhow::anyhow!("Database max connections cannot be 0"));
    }

    if config.db_timeout_seconds() == 0 {
        return Err(anyhow::anyhow!("Database timeout cannot be 0"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(pairs: &'static [(&'static str, &'static str)]) -> Config {
        Config::from_lookup(move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        })
        .unwrap()
    }

    #[test]
    fn test_default_config_passes() {
        let config = config_with(&[("DATABASE_URL", "postgres://u:p@localhost/docrelay")]);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_zero_pool_size_is_rejected() {
        let config = config_with(&[
            ("DATABASE_URL", "postgres://u:p@localhost/docrelay"),
            ("DB_MAX_CONNECTIONS", "0"),
        ]);
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_wildcard_cors_in_production_only_warns() {
        let config = config_with(&[
            ("DATABASE_URL", "postgres://u:p@localhost/docrelay"),
            ("NODE_ENV", "production"),
            ("POSTGRES_PASSWORD", "s3cret"),
        ]);
        assert!(validate_config(&config).is_ok());
    }
}
