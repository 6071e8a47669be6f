//! Access-control statements executed on behalf of a session
//!
//! Every statement checks the acting session's enabled access before touching the
//! entity store, and every outcome is recorded by the audit logger.

pub mod definitions;
mod grants;
mod roles;
mod sessions;
mod system;
mod types;
mod users;
mod views;

pub use definitions::{AccessDefinitions, DefinitionsReport};
pub use system::AccessControl;
pub use types::RoleSet;
