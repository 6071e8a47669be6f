//! Error handling utilities
//!
//! This module provides the engine error type and its classification helpers.

pub mod error;
pub mod utils;

// Re-export commonly used types and functions
pub use error::*;
pub use utils::ErrorCategory;
