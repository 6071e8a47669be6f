//! Integration tests for rbac-engine
//!
//! These tests drive the engine through its statement API and check what a client
//! would observe.

pub mod cache_expiration_tests;
pub mod concurrency_tests;
pub mod definitions_tests;
pub mod introspection_tests;
pub mod role_tests;
