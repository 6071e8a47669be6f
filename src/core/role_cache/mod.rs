//! Expiring cache of resolved roles
//!
//! A resolved role is a role flattened through every role reachable from it. Entries are
//! trusted for one TTL window; mutations reported by the entity store dirty only the
//! mutated role's own entry.

pub mod cache;
pub mod types;


pub use cache::RoleCache;
pub use types::{CacheEntry, ResolvedRole, RoleCacheStats};
