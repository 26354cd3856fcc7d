//! PermStore configuration system.
//!
//! TOML-based configuration with environment variable overrides. The storage
//! backend is chosen here once and held fixed for the process lifetime.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

mod loader;

pub use loader::ConfigLoader;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Which storage backend the process runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Postgres,
    Sqlite,
}

impl BackendKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Some(BackendKind::Postgres),
            "sqlite" => Some(BackendKind::Sqlite),
            _ => None,
        }
    }
}

/// Root application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Storage backend selected at startup
    pub backend: BackendKind,
    pub postgres: PostgresConfig,
    pub sqlite: SqliteConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Sqlite,
            postgres: PostgresConfig::default(),
            sqlite: SqliteConfig::default(),
        }
    }
}

/// Relational backend connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PostgresConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost:5432/permstore".to_string(),
            max_connections: 5,
        }
    }
}

/// Embedded backend connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SqliteConfig {
    pub url: String,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Basic sanity checks on the loaded values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.postgres.url.is_empty() {
            return Err(ConfigError::ValidationError(
                "postgres.url must not be empty".to_string(),
            ));
        }
        if self.sqlite.url.is_empty() {
            return Err(ConfigError::ValidationError(
                "sqlite.url must not be empty".to_string(),
            ));
        }
        if self.postgres.max_connections == 0 {
            return Err(ConfigError::ValidationError(
                "postgres.max_connections must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
