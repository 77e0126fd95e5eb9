//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use axum::http::HeaderValue;
use std::net::SocketAddr;
use tracing::Level;

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:9000";
const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    /// Single origin allowed by CORS. `None` means any origin.
    pub cors_allowed_origin: Option<HeaderValue>,
    pub max_body_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([127, 0, 0, 1], 9000)),
            log_level: Level::INFO,
            cors_allowed_origin: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_address_str =
            lookup("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let cors_allowed_origin = lookup("CORS_ALLOWED_ORIGIN")
            .filter(|origin| !origin.trim().is_empty())
            .map(|origin| {
                origin.parse::<HeaderValue>().map_err(|e| {
                    ConfigError::InvalidValue("CORS_ALLOWED_ORIGIN".to_string(), e.to_string())
                })
            })
            .transpose()?;

        let max_body_bytes = match lookup("MAX_BODY_BYTES") {
            Some(raw) => raw.parse::<usize>().map_err(|e| {
                ConfigError::InvalidValue("MAX_BODY_BYTES".to_string(), e.to_string())
            })?,
            None => DEFAULT_MAX_BODY_BYTES,
        };

        Ok(Self {
            bind_address,
            log_level,
            cors_allowed_origin,
            max_body_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = load(&[]).unwrap();
        let defaults = Config::default();
        assert_eq!(config.bind_address, defaults.bind_address);
        assert_eq!(config.bind_address.port(), 9000);
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.cors_allowed_origin, None);
        assert_eq!(config.max_body_bytes, 1024 * 1024);
    }

    #[test]
    fn test_reads_every_variable() {
        let config = load(&[
            ("BIND_ADDRESS", "0.0.0.0:8080"),
            ("RUST_LOG", "debug"),
            ("CORS_ALLOWED_ORIGIN", "http://localhost:3000"),
            ("MAX_BODY_BYTES", "2048"),
        ])
        .unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(
            config.cors_allowed_origin,
            Some(HeaderValue::from_static("http://localhost:3000"))
        );
        assert_eq!(config.max_body_bytes, 2048);
    }

    #[test]
    fn test_rejects_bad_bind_address() {
        let err = load(&[("BIND_ADDRESS", "localhost")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref var, _) if var == "BIND_ADDRESS"));
    }

    #[test]
    fn test_rejects_bad_log_level() {
        let err = load(&[("RUST_LOG", "chatty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref var, _) if var == "RUST_LOG"));
    }

    #[test]
    fn test_rejects_cors_origin_with_control_characters() {
        let err = load(&[("CORS_ALLOWED_ORIGIN", "http://a\nb")]).unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidValue(ref var, _) if var == "CORS_ALLOWED_ORIGIN")
        );
    }

    #[test]
    fn test_blank_cors_origin_means_unset() {
        let config = load(&[("CORS_ALLOWED_ORIGIN", "  ")]).unwrap();
        assert_eq!(config.cors_allowed_origin, None);
    }
}
