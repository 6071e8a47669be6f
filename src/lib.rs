//! # rbac-engine
//!
//! Role-based access control for a database: users, roles, privilege grants with
//! partial revokes, role grants with admin option, per-session role activation and a
//! time-bounded cache of resolved roles.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rbac_engine::{AccessControl, AccessType, Config, GrantScope};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let access = AccessControl::from_config(&Config::default())?;
//!     let admin = access.admin_session()?;
//!
//!     access.create_user(&admin, "A", false)?;
//!     access.create_role(&admin, "R1", false)?;
//!     access.grant_privileges(
//!         &admin,
//!         &[AccessType::Select],
//!         &GrantScope::table("test", "table"),
//!         &["R1"],
//!         false,
//!     )?;
//!     access.grant_roles(&admin, &["R1"], &["A"], false)?;
//!
//!     let session = access.login("A")?;
//!     access.check_access(&session, AccessType::Select, &GrantScope::table("test", "table"))?;
//!     println!("{:?}", access.show_grants(&admin, Some("A"))?);
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod access;
pub mod config;
pub mod core;
pub mod utils;

// Re-export main types
pub use access::{AccessControl, AccessDefinitions, RoleSet};
pub use config::Config;
pub use core::models::{AccessType, GrantScope, PrincipalId, PrincipalKind, Resource, RoleSelection};
pub use core::role_cache::{RoleCache, RoleCacheStats};
pub use core::session::{Session, SetRole};
pub use core::store::EntityStore;
pub use utils::error::{AccessError, Result};

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
