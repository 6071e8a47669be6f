//! Configuration data models

pub mod access_control;
pub mod logging;

pub use access_control::*;
pub use logging::*;

/// Default role cache expiration in seconds
pub fn default_role_cache_expiration() -> u64 {
    600
}

/// Default idle session timeout in seconds
pub fn default_session_timeout() -> u64 {
    3600
}

pub fn default_user() -> String {
    "default".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}
