//! Configuration management for the access-control engine
//!
//! This module handles loading, validation, and merging of the engine configuration.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{AccessError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Main configuration struct
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub access_control: AccessControlConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| AccessError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| AccessError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load configuration from `RBAC_*` environment variables
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let mut config = Self::default();
        let access = &mut config.access_control;
        if let Some(seconds) = env_parse("RBAC_ROLE_CACHE_EXPIRATION_TIME_SECONDS")? {
            access.role_cache_expiration_time_seconds = seconds;
        }
        if let Some(seconds) = env_parse("RBAC_SESSION_TIMEOUT_SECONDS")? {
            access.session_timeout_seconds = seconds;
        }
        if let Ok(user) = std::env::var("RBAC_DEFAULT_USER") {
            access.default_user = user;
        }
        if let Ok(path) = std::env::var("RBAC_STORAGE_PATH") {
            access.storage_path = Some(PathBuf::from(path));
        }
        if let Ok(level) = std::env::var("RBAC_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Some(json) = env_parse("RBAC_LOG_JSON")? {
            config.logging.json = json;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn access_control(&self) -> &AccessControlConfig {
        &self.access_control
    }

    pub fn logging(&self) -> &LoggingConfig {
        &self.logging
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.access_control
            .validate()
            .map_err(|e| AccessError::Config(format!("Access control config error: {}", e)))?;

        self.logging
            .validate()
            .map_err(|e| AccessError::Config(format!("Logging config error: {}", e)))?;

        Ok(())
    }

    /// Merge with another configuration (other takes precedence)
    pub fn merge(mut self, other: Self) -> Self {
        self.access_control = self.access_control.merge(other.access_control);
        self.logging = self.logging.merge(other.logging);
        self
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| AccessError::Config(format!("Failed to serialize config to JSON: {}", e)))
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| AccessError::Config(format!("Failed to serialize config to YAML: {}", e)))
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| AccessError::Config(format!("Invalid value for {}: {}", name, value))),
        Err(_) => Ok(None),
    }
}
