//! Core of the access-control engine
//!
//! Leaves first: domain models and access rights, the entity store, the role cache,
//! the privilege resolver, session role activation and introspection.

pub mod introspection;
pub mod models;
pub mod resolver;
pub mod rights;
pub mod role_cache;
pub mod session;
pub mod store;
