//! Application Configuration
//!
//! This module provides configuration management for the application,
//! supporting YAML configuration files with sensible defaults and the
//! environment overrides used by deployments.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::fs;
use log::{info, warn};

pub use crate::auth::config::{AuthConfig, TokenAlgorithm};
pub use crate::storage::config::{StorageBackend, StorageConfig};

const DEFAULT_CONFIG_PATH: &str = "config.yaml";
const DEFAULT_LOG_CONFIG_FILE: &str = "server_log.yaml";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Object storage configuration
    pub storage: StorageConfig,
    /// Credential verification configuration
    pub auth: AuthConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Number of worker threads
    pub workers: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            workers: 4,
        }
    }
}

fn config_path() -> String {
    env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}

/// log4rs configuration file: `LOG_CONFIG`, else `server_log.yaml` next to
/// the application config. Resolved without reading the application config
/// so logging can start before it is loaded.
pub fn log_config_path() -> PathBuf {
    if let Ok(path) = env::var("LOG_CONFIG") {
        return PathBuf::from(path);
    }
    let config_path = config_path();
    Path::new(&config_path)
        .parent()
        .map(|dir| dir.join(DEFAULT_LOG_CONFIG_FILE))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_CONFIG_FILE))
}

impl AppConfig {
    /// Load configuration from `CONFIG_PATH` (or `config.yaml`), use
    /// defaults if not found, then apply environment overrides
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let mut config = Self::from_file(&config_path())?;
        config.apply_env();
        Ok(config)
    }

    /// Read a YAML configuration file, defaults when it does not exist
    pub fn from_file(config_path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        if Path::new(config_path).exists() {
            let content = fs::read_to_string(config_path)?;
            let config: AppConfig = serde_yaml::from_str(&content)?;
            info!("Loaded configuration from {}", config_path);
            Ok(config)
        } else {
            warn!("Config file {} not found, using defaults", config_path);
            Ok(Self::default())
        }
    }

    pub fn apply_env(&mut self) {
        self.storage.apply_env();
        self.auth.apply_env();
    }
}
