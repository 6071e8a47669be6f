//! Access-control and logging validators

use super::trait_def::Validate;
use crate::config::models::{AccessControlConfig, LoggingConfig};
use tracing_subscriber::EnvFilter;

impl Validate for AccessControlConfig {
    fn validate(&self) -> Result<(), String> {
        if self.role_cache_expiration_time_seconds == 0 {
            return Err("role_cache_expiration_time_seconds must be greater than 0".to_string());
        }

        if self.session_timeout_seconds == 0 {
            return Err("session_timeout_seconds must be greater than 0".to_string());
        }

        if self.default_user.trim().is_empty() {
            return Err("default_user cannot be empty".to_string());
        }

        if let Some(path) = &self.storage_path {
            if path.as_os_str().is_empty() {
                return Err("storage_path cannot be empty".to_string());
            }
            if path.is_file() {
                return Err(format!("storage_path {:?} is a file, expected a directory", path));
            }
        }

        Ok(())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.level.trim().is_empty() {
            return Err("Log level cannot be empty".to_string());
        }

        EnvFilter::try_new(&self.level)
            .map_err(|e| format!("Invalid log level '{}': {}", self.level, e))?;

        Ok(())
    }
}
