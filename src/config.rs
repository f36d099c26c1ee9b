//! Configuration module
//!
//! Loads configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::filter::DEFAULT_SIZE_LIMIT;
use crate::notifier::NotifierConfig;

/// Where contacts are persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// PostgreSQL at the given URL
    Postgres { database_url: String },
    /// Process-local memory; contents are lost on restart
    Memory,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Contact storage backend
    pub storage: StorageBackend,

    /// Maximum database connections in pool
    pub database_max_connections: u32,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,

    /// Upper bound on a single filtered listing
    pub list_timeout: Duration,

    /// Compiled size cap for name filter patterns, in bytes
    pub regex_size_limit: usize,

    /// Creation event notifier settings
    pub notifier: NotifierConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let storage = match lookup("STORAGE_BACKEND").as_deref().unwrap_or("postgres") {
            "postgres" => StorageBackend::Postgres {
                database_url: required(&lookup, "DATABASE_URL")?,
            },
            "memory" => StorageBackend::Memory,
            _ => return Err(ConfigError::InvalidValue("STORAGE_BACKEND")),
        };

        let database_max_connections = parsed(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?;

        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());

        let port = parsed(&lookup, "PORT", 8080)?;

        let environment = lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string());

        let list_timeout = Duration::from_secs(parsed(&lookup, "LIST_TIMEOUT_SECS", 30)?);

        let regex_size_limit = parsed(&lookup, "REGEX_SIZE_LIMIT", DEFAULT_SIZE_LIMIT)?;

        let notifier = notifier_from_lookup(&lookup)?;

        Ok(Self {
            storage,
            database_max_connections,
            host,
            port,
            environment,
            list_timeout,
            regex_size_limit,
            notifier,
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn notifier_from_lookup<F>(lookup: &F) -> Result<NotifierConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let endpoints: Vec<String> = required(lookup, "BROKER_ENDPOINTS")?
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if endpoints.is_empty() {
        return Err(ConfigError::Blank("BROKER_ENDPOINTS"));
    }

    let channel = required(lookup, "CONTACT_EVENT_CHANNEL")?;

    let mut config = NotifierConfig::new(endpoints, channel.trim());
    config.include_type_header = parsed(lookup, "NOTIFIER_TYPE_HEADER", false)?;
    config.queue_capacity = parsed(lookup, "NOTIFIER_QUEUE_CAPACITY", config.queue_capacity)?;
    config.enqueue_timeout =
        Duration::from_millis(parsed(lookup, "NOTIFIER_ENQUEUE_TIMEOUT_MS", 50)?);
    config.max_attempts = parsed(lookup, "NOTIFIER_MAX_ATTEMPTS", config.max_attempts)?;
    config.request_timeout =
        Duration::from_millis(parsed(lookup, "NOTIFIER_REQUEST_TIMEOUT_MS", 5000)?);

    if config.max_attempts == 0 {
        return Err(ConfigError::InvalidValue("NOTIFIER_MAX_ATTEMPTS"));
    }
    if config.queue_capacity == 0 {
        return Err(ConfigError::InvalidValue("NOTIFIER_QUEUE_CAPACITY"));
    }

    Ok(config)
}

/// Read a variable that must be present and non-blank
fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(key).ok_or(ConfigError::MissingEnv(key))?;
    if value.trim().is_empty() {
        return Err(ConfigError::Blank(key));
    }
    Ok(value)
}

/// Parse an optional variable, falling back to `default` when unset
fn parsed<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue(key)),
        None => Ok(default),
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),

    #[error("Environment variable must not be blank: {0}")]
    Blank(&'static str),
}
