//! Configuration validation
//!
//! - `trait_def`: the `Validate` trait
//! - `access_validators`: access-control and logging validators
//! - `tests`: validator tests

mod access_validators;
mod trait_def;

pub use trait_def::Validate;
