//! Access-control engine configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Access-control engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControlConfig {
    /// How long a resolved role is trusted before it is rebuilt
    #[serde(default = "default_role_cache_expiration")]
    pub role_cache_expiration_time_seconds: u64,
    /// Idle time after which a named session is torn down
    #[serde(default = "default_session_timeout")]
    pub session_timeout_seconds: u64,
    /// Bootstrap administrator, created on startup if absent
    #[serde(default = "default_user")]
    pub default_user: String,
    /// Directory holding the access snapshot; memory only when unset
    #[serde(default)]
    pub storage_path: Option<PathBuf>,
}

impl Default for AccessControlConfig {
    fn default() -> Self {
        Self {
            role_cache_expiration_time_seconds: default_role_cache_expiration(),
            session_timeout_seconds: default_session_timeout(),
            default_user: default_user(),
            storage_path: None,
        }
    }
}

impl AccessControlConfig {
    pub fn role_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.role_cache_expiration_time_seconds)
    }

    pub fn session_timeout(&self) -> Duration {
        Duration::from_secs(self.session_timeout_seconds)
    }

    /// Merge access-control configurations; non-default values of `other` win
    pub fn merge(mut self, other: Self) -> Self {
        if other.role_cache_expiration_time_seconds != default_role_cache_expiration() {
            self.role_cache_expiration_time_seconds = other.role_cache_expiration_time_seconds;
        }
        if other.session_timeout_seconds != default_session_timeout() {
            self.session_timeout_seconds = other.session_timeout_seconds;
        }
        if other.default_user != default_user() {
            self.default_user = other.default_user;
        }
        if other.storage_path.is_some() {
            self.storage_path = other.storage_path;
        }
        self
    }
}
