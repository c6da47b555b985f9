//! Back-office configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ADMIN_DATABASE_URL` - `PostgreSQL` connection string
//!   (falls back to `DATABASE_URL`)
//! - `ADMIN_BASE_URL` - URL the panel is served from
//! - `ADMIN_SESSION_SECRET` - Session signing secret (min 32 chars)
//!
//! ## Optional
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1; the panel is expected
//!   to sit behind a VPN or private network, never the public internet)
//! - `ADMIN_PORT` - Listen port (default: 3001)
//! - `UPLOADS_DIR` - Directory product images are written to (default: uploads)
//! - `STORE_LEGAL_NAME` - Issuer name on printed declarations
//! - `STORE_CNPJ` - Issuer tax number on printed declarations
//! - `WHATSAPP_COUNTRY_CODE` - Prefix for wa.me links (default: 55)
//! - `SENTRY_DSN` / `SENTRY_ENVIRONMENT` - Error tracking

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_SESSION_SECRET_LENGTH: usize = 32;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Identity printed on declarations of content.
#[derive(Debug, Clone)]
pub struct StoreIdentity {
    pub legal_name: String,
    pub cnpj: String,
}

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Base URL the panel is served from
    pub base_url: String,
    /// Session signing secret
    pub session_secret: SecretString,
    /// Directory product images are written to
    pub uploads_dir: PathBuf,
    /// Issuer identity for printed documents
    pub store: StoreIdentity,
    /// Country code prefix for WhatsApp deep links
    pub whatsapp_country_code: String,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("ADMIN_DATABASE_URL")?;
        let host = get_env_or_default("ADMIN_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("ADMIN_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_PORT".to_string(), e.to_string()))?;
        let base_url = get_required_env("ADMIN_BASE_URL")?;
        let session_secret = get_session_secret("ADMIN_SESSION_SECRET")?;
        let uploads_dir = PathBuf::from(get_env_or_default("UPLOADS_DIR", "uploads"));

        let store = StoreIdentity {
            legal_name: get_env_or_default("STORE_LEGAL_NAME", "Reis Imports"),
            cnpj: get_env_or_default("STORE_CNPJ", "39433448000134"),
        };
        let whatsapp_country_code = get_env_or_default("WHATSAPP_COUNTRY_CODE", "55");

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            session_secret,
            uploads_dir,
            store,
            whatsapp_country_code,
            sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            sentry_environment: std::env::var("SENTRY_ENVIRONMENT").ok(),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

fn get_session_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    if value.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            key.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SESSION_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_session_secret_length_is_enforced() {
        let value = SecretString::from("short");
        assert!(value.expose_secret().len() < MIN_SESSION_SECRET_LENGTH);
    }

    #[test]
    fn test_socket_addr() {
        let config = AdminConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3001,
            base_url: "http://localhost:3001".to_string(),
            session_secret: SecretString::from("x".repeat(32)),
            uploads_dir: PathBuf::from("uploads"),
            store: StoreIdentity {
                legal_name: "Reis Imports".to_string(),
                cnpj: "39433448000134".to_string(),
            },
            whatsapp_country_code: "55".to_string(),
            sentry_dsn: None,
            sentry_environment: None,
        };

        assert_eq!(config.socket_addr().port(), 3001);
    }
}
