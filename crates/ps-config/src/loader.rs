//! Configuration loader with file and environment variable support

use crate::{AppConfig, BackendKind, ConfigError};
use std::env;
use std::path::PathBuf;
use tracing::{info, warn};

/// Standard config file search paths
const CONFIG_PATHS: &[&str] = &[
    "config.toml",
    "permstore.toml",
    "./config/permstore.toml",
    "/etc/permstore/config.toml",
];

/// Configuration loader
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self { config_path: None }
    }

    /// Create a loader with a specific config file path
    pub fn with_path<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            config_path: Some(path.into()),
        }
    }

    /// Load configuration from file (if found) with environment variable overrides
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        let mut config = AppConfig::default();

        if let Some(path) = self.find_config_file() {
            info!(?path, "Loading configuration from file");
            config = AppConfig::from_file(&path)?;
        }

        self.apply_env_overrides(&mut config);
        config.validate()?;

        Ok(config)
    }

    fn find_config_file(&self) -> Option<PathBuf> {
        if let Some(path) = &self.config_path {
            if path.exists() {
                return Some(path.clone());
            }
        }

        if let Ok(path) = env::var("PERMSTORE_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        for path in CONFIG_PATHS {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        None
    }

    fn apply_env_overrides(&self, config: &mut AppConfig) {
        if let Ok(val) = env::var("PERMSTORE_BACKEND") {
            match BackendKind::parse(&val) {
                Some(kind) => config.backend = kind,
                None => warn!(value = %val, "Ignoring unknown PERMSTORE_BACKEND"),
            }
        }

        if let Ok(val) = env::var("PERMSTORE_POSTGRES_URL") {
            config.postgres.url = val;
        }
        if let Ok(val) = env::var("PERMSTORE_POSTGRES_MAX_CONNECTIONS") {
            if let Ok(max) = val.parse() {
                config.postgres.max_connections = max;
            }
        }

        if let Ok(val) = env::var("PERMSTORE_SQLITE_URL") {
            config.sqlite.url = val;
        }
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
