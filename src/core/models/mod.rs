//! Domain models of the access-control engine

pub mod access_type;
pub mod principal;
pub mod role_selection;
pub mod scope;

pub use access_type::{AccessType, GrantLevel};
pub use principal::{GrantedRole, GrantedRoles, Principal, PrincipalId, PrincipalKind};
pub use role_selection::RoleSelection;
pub use scope::{GrantScope, Resource};
