//! Logging setup and the audit trail
//!
//! Diagnostics go through `tracing` under the crate's module targets; access-control
//! decisions are additionally recorded on the `audit` target by [`AuditLogger`].

pub mod audit;

pub use audit::{AUDIT_TARGET, AuditLogger};

use crate::config::LoggingConfig;
use crate::utils::error::{AccessError, Result};
use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| AccessError::config(format!("Invalid log level '{}': {}", config.level, e)))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| AccessError::config(format!("Failed to install logger: {}", e)))
}
