//! Common test utilities for rbac-engine
//!
//! # Usage
//!
//! ```rust
//! use crate::common::fixtures::TestEngine;
//!
//! #[test]
//! fn my_test() {
//!     let engine = TestEngine::new();
//!     engine.create_users(&["A"]);
//!     // ...
//! }
//! ```

pub mod fixtures;

pub use fixtures::{TestEngine, assert_not_enough_privileges};
