//! Utility modules
//!
//! - **error**: the crate error type and its categories
//! - **logging**: subscriber setup and the audit trail

pub mod error;
pub mod logging;

pub use error::{AccessError, ErrorCategory, Result};
pub use logging::{AuditLogger, init_logging};
