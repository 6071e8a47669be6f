//! Error handling for the access-control engine
//!
//! This module defines all error types returned by the engine.

#![allow(missing_docs)]

mod helpers;
mod types;

pub use types::{AccessError, Result};
