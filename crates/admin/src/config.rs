//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ADMIN_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `FRONTEND_STORE_URL` - Public URL of the shop frontend (links in customer emails)
//! - `FRONTEND_DASHBOARD_URL` - Public URL of the dashboard frontend
//! - `SMTP_HOST` - SMTP server hostname
//! - `SMTP_USERNAME` - SMTP authentication username
//! - `SMTP_PASSWORD` - SMTP authentication password
//! - `SMTP_FROM` - Email sender address
//!
//! ## Optional
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 4001)
//! - `OWNER_ID_HEADER` - Header carrying the verified owner subject (default: x-owner-id)
//! - `ALLOWED_ORIGINS` - Comma-separated CORS origins (default: the dashboard URL)
//! - `SMTP_PORT` - SMTP port (default: 587)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag
//! - `SENTRY_SAMPLE_RATE` - Sentry error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Sentry tracing sample rate (default: 0.1)

use std::net::{IpAddr, SocketAddr};

use axum::http::HeaderName;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const MIN_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "dummy",
    "sample",
    "test-key",
    "12345",
    "abcdef",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {0}: {1}")]
    InvalidEnvVar(String, String),

    #[error("insecure value for {0}: {1}")]
    InsecureSecret(String, String),
}

/// Runtime configuration for the admin API.
///
/// Implements `Debug` manually to redact credentials.
#[derive(Clone)]
pub struct AdminConfig {
    /// `PostgreSQL` connection string
    pub database_url: SecretString,
    /// Bind address
    pub host: IpAddr,
    /// Listen port
    pub port: u16,
    /// Public URL of the shop frontend, no trailing slash
    pub frontend_store_url: String,
    /// Public URL of the dashboard frontend, no trailing slash
    pub frontend_dashboard_url: String,
    /// Header the identity proxy writes the verified owner subject into
    pub owner_id_header: HeaderName,
    /// Origins allowed by CORS
    pub allowed_origins: Vec<String>,
    /// Email configuration
    pub email: EmailConfig,
    /// Sentry DSN (errors reported when set)
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate
    pub sentry_sample_rate: f32,
    /// Sentry tracing sample rate
    pub sentry_traces_sample_rate: f32,
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("database_url", &"[REDACTED]")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("frontend_store_url", &self.frontend_store_url)
            .field("frontend_dashboard_url", &self.frontend_dashboard_url)
            .field("owner_id_header", &self.owner_id_header)
            .field("allowed_origins", &self.allowed_origins)
            .field("email", &self.email)
            .field("sentry_dsn", &self.sentry_dsn.as_deref().map(|_| "[REDACTED]"))
            .field("sentry_environment", &self.sentry_environment)
            .finish_non_exhaustive()
    }
}

/// Email (SMTP) configuration.
#[derive(Clone)]
pub struct EmailConfig {
    /// SMTP server hostname
    pub smtp_host: String,
    /// SMTP server port
    pub smtp_port: u16,
    /// SMTP authentication username
    pub smtp_username: String,
    /// SMTP authentication password
    pub smtp_password: SecretString,
    /// Email sender address (From header)
    pub from_address: String,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_username", &self.smtp_username)
            .field("smtp_password", &"[REDACTED]")
            .field("from_address", &self.from_address)
            .finish()
    }
}

impl AdminConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    /// Returns `ConfigError` if a required variable is missing, malformed,
    /// or a secret fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let database_url = get_database_url("ADMIN_DATABASE_URL")?;

        let host: IpAddr = get_env_or_default("ADMIN_HOST", "127.0.0.1")
            .parse()
            .map_err(|e: std::net::AddrParseError| {
                ConfigError::InvalidEnvVar("ADMIN_HOST".to_string(), e.to_string())
            })?;

        let port: u16 = get_env_or_default("ADMIN_PORT", "4001")
            .parse()
            .map_err(|e: std::num::ParseIntError| {
                ConfigError::InvalidEnvVar("ADMIN_PORT".to_string(), e.to_string())
            })?;

        let frontend_store_url = get_required_env("FRONTEND_STORE_URL")?;
        validate_origin("FRONTEND_STORE_URL", &frontend_store_url)?;
        let frontend_store_url = frontend_store_url.trim_end_matches('/').to_string();

        let frontend_dashboard_url = get_required_env("FRONTEND_DASHBOARD_URL")?;
        validate_origin("FRONTEND_DASHBOARD_URL", &frontend_dashboard_url)?;
        let frontend_dashboard_url = frontend_dashboard_url.trim_end_matches('/').to_string();

        let owner_id_header = parse_header_name(&get_env_or_default(
            "OWNER_ID_HEADER",
            "x-owner-id",
        ))?;

        let allowed_origins = match get_optional_env("ALLOWED_ORIGINS") {
            Some(raw) => parse_origin_list(&raw)?,
            None => vec![frontend_dashboard_url.clone()],
        };

        let sentry_sample_rate: f32 = get_env_or_default("SENTRY_SAMPLE_RATE", "1.0")
            .parse()
            .map_err(|e: std::num::ParseFloatError| {
                ConfigError::InvalidEnvVar("SENTRY_SAMPLE_RATE".to_string(), e.to_string())
            })?;

        let sentry_traces_sample_rate: f32 = get_env_or_default("SENTRY_TRACES_SAMPLE_RATE", "0.1")
            .parse()
            .map_err(|e: std::num::ParseFloatError| {
                ConfigError::InvalidEnvVar("SENTRY_TRACES_SAMPLE_RATE".to_string(), e.to_string())
            })?;

        Ok(Self {
            database_url,
            host,
            port,
            frontend_store_url,
            frontend_dashboard_url,
            owner_id_header,
            allowed_origins,
            email: EmailConfig::from_env()?,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Socket address to bind the server to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl EmailConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let smtp_port = get_env_or_default("SMTP_PORT", "587")
            .parse()
            .map_err(|e: std::num::ParseIntError| {
                ConfigError::InvalidEnvVar("SMTP_PORT".to_string(), e.to_string())
            })?;

        Ok(Self {
            smtp_host: get_required_env("SMTP_HOST")?,
            smtp_port,
            smtp_username: get_required_env("SMTP_USERNAME")?,
            smtp_password: get_validated_secret("SMTP_PASSWORD")?,
            from_address: get_required_env("SMTP_FROM")?,
        })
    }
}

// ============================================================================
// Environment helpers
// ============================================================================

fn get_required_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn get_optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn get_env_or_default(name: &str, default: &str) -> String {
    get_optional_env(name).unwrap_or_else(|| default.to_string())
}

/// Reads a database URL, falling back to the shared `DATABASE_URL`.
fn get_database_url(name: &str) -> Result<SecretString, ConfigError> {
    get_optional_env(name)
        .or_else(|| get_optional_env("DATABASE_URL"))
        .map(SecretString::from)
        .ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
}

/// Reads a secret and rejects placeholder or low-entropy values.
fn get_validated_secret(name: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(name)?;
    validate_secret_strength(name, &value)?;
    Ok(SecretString::from(value))
}

fn validate_secret_strength(name: &str, value: &str) -> Result<(), ConfigError> {
    if value.len() < MIN_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            name.to_string(),
            format!("must be at least {MIN_SECRET_LENGTH} characters"),
        ));
    }

    let lowered = value.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lowered.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                name.to_string(),
                format!("contains placeholder pattern '{pattern}'"),
            ));
        }
    }

    let entropy = shannon_entropy(value);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            name.to_string(),
            format!("entropy too low ({entropy:.2} bits/char, need {MIN_ENTROPY_BITS_PER_CHAR})"),
        ));
    }

    Ok(())
}

/// Shannon entropy in bits per character.
#[allow(clippy::cast_precision_loss)]
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut counts = std::collections::HashMap::new();
    for c in s.chars() {
        *counts.entry(c).or_insert(0u32) += 1;
    }

    let len = s.chars().count() as f64;
    counts
        .values()
        .map(|&count| {
            let p = f64::from(count) / len;
            -p * p.log2()
        })
        .sum()
}

/// Parses and lowercases a header name from the environment.
fn parse_header_name(raw: &str) -> Result<HeaderName, ConfigError> {
    HeaderName::from_bytes(raw.to_lowercase().as_bytes())
        .map_err(|e| ConfigError::InvalidEnvVar("OWNER_ID_HEADER".to_string(), e.to_string()))
}

/// Splits a comma-separated origin list, validating each entry.
fn parse_origin_list(raw: &str) -> Result<Vec<String>, ConfigError> {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.trim_end_matches('/').to_string())
        .collect();

    if origins.is_empty() {
        return Err(ConfigError::InvalidEnvVar(
            "ALLOWED_ORIGINS".to_string(),
            "no origins listed".to_string(),
        ));
    }

    for origin in &origins {
        validate_origin("ALLOWED_ORIGINS", origin)?;
    }

    Ok(origins)
}

fn validate_origin(name: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(name.to_string(), e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidEnvVar(
            name.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_header_name_case_insensitively() {
        let header = parse_header_name("X-Owner-Id").unwrap();
        assert_eq!(header.as_str(), "x-owner-id");
    }

    #[test]
    fn rejects_header_name_with_spaces() {
        assert!(parse_header_name("owner id").is_err());
    }

    #[test]
    fn parses_origin_list() {
        let origins =
            parse_origin_list("https://dash.example.com, http://localhost:3001/").unwrap();
        assert_eq!(
            origins,
            vec!["https://dash.example.com", "http://localhost:3001"]
        );
    }

    #[test]
    fn rejects_non_http_origin() {
        assert!(parse_origin_list("ftp://files.example.com").is_err());
    }

    #[test]
    fn rejects_placeholder_secret() {
        let result =
            validate_secret_strength("TEST_KEY", "your-smtp-password-goes-right-here");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn accepts_strong_secret() {
        let result = validate_secret_strength("TEST_KEY", "mK9zQw2rT8xVb4nJd6hFs3pLc7gYe5uW");
        assert!(result.is_ok());
    }

    #[test]
    fn email_debug_output_redacts_password() {
        let config = EmailConfig {
            smtp_host: "smtp.example.com".to_string(),
            smtp_port: 587,
            smtp_username: "mailer".to_string(),
            smtp_password: SecretString::from("app-password-value"),
            from_address: "orders@example.com".to_string(),
        };

        let output = format!("{config:?}");
        assert!(output.contains("[REDACTED]"));
        assert!(!output.contains("app-password-value"));
    }

    #[test]
    fn socket_addr_combines_host_and_port() {
        let config = AdminConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "0.0.0.0".parse().unwrap(),
            port: 4001,
            frontend_store_url: "https://shop.example.com".to_string(),
            frontend_dashboard_url: "https://dash.example.com".to_string(),
            owner_id_header: HeaderName::from_static("x-owner-id"),
            allowed_origins: vec!["https://dash.example.com".to_string()],
            email: EmailConfig {
                smtp_host: "smtp.example.com".to_string(),
                smtp_port: 587,
                smtp_username: "mailer".to_string(),
                smtp_password: SecretString::from("hunter2"),
                from_address: "orders@example.com".to_string(),
            },
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.1,
        };

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:4001");
    }
}
