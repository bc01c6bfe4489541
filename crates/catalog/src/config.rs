//! Catalog configuration loaded from environment variables.

use std::net::{IpAddr, SocketAddr};

use orchard_core::pagination::DEFAULT_PER_PAGE;
use secrecy::SecretString;
use thiserror::Error;

/// Largest page size accepted from configuration.
pub const MAX_PER_PAGE: u64 = 100;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Catalog application configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// `PostgreSQL` connection URL.
    pub database_url: SecretString,
    pub host: IpAddr,
    pub port: u16,
    /// Base URL product images are resolved against.
    pub asset_url: String,
    /// Products per listing page.
    pub per_page: u64,
    /// Emit JSON logs instead of text.
    pub log_json: bool,
    pub sentry_dsn: Option<String>,
    pub sentry_environment: Option<String>,
}

impl CatalogConfig {
    /// Load configuration from environment variables (and `.env` if present).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("CATALOG_DATABASE_URL")
            .or_else(|| lookup("DATABASE_URL"))
            .map(SecretString::from)
            .ok_or_else(|| ConfigError::MissingEnvVar("CATALOG_DATABASE_URL".to_string()))?;

        let per_page: u64 = match lookup("CATALOG_PER_PAGE") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|e: std::num::ParseIntError| {
                    ConfigError::InvalidEnvVar("CATALOG_PER_PAGE".to_string(), e.to_string())
                })?,
            None => DEFAULT_PER_PAGE,
        };
        if !(1..=MAX_PER_PAGE).contains(&per_page) {
            return Err(ConfigError::InvalidEnvVar(
                "CATALOG_PER_PAGE".to_string(),
                format!("must be between 1 and {MAX_PER_PAGE}"),
            ));
        }

        Ok(Self {
            database_url,
            host: parse_var(&lookup, "CATALOG_HOST", "127.0.0.1")?,
            port: parse_var(&lookup, "CATALOG_PORT", "3001")?,
            asset_url: lookup("CATALOG_ASSET_URL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| "/static".to_string()),
            per_page,
            log_json: lookup("ORCHARD_LOG_JSON")
                .is_some_and(|v| !matches!(v.trim(), "" | "0" | "false")),
            sentry_dsn: lookup("SENTRY_DSN").filter(|v| !v.is_empty()),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .unwrap_or_else(|| default.to_string())
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
