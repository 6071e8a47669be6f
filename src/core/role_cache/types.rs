//! Role cache type definitions

use crate::core::models::PrincipalId;
use crate::core::rights::EffectiveAccess;
use crate::core::store::RoleClosure;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// A role flattened through its granted roles
#[derive(Debug, Clone)]
pub struct ResolvedRole {
    pub id: PrincipalId,
    pub name: String,
    /// Own rights plus the rights of every reachable role, one component per role
    pub access: EffectiveAccess,
    /// The role itself and every role reachable from it, breadth first
    pub enabled_roles: Vec<PrincipalId>,
    /// Roles granted with admin option anywhere in the closure
    pub roles_with_admin_option: HashSet<PrincipalId>,
}

impl From<RoleClosure> for ResolvedRole {
    fn from(closure: RoleClosure) -> Self {
        let mut access = EffectiveAccess::new();
        let mut enabled_roles = Vec::with_capacity(closure.members.len());
        for (id, rights) in closure.members {
            access.add(id, rights);
            enabled_roles.push(id);
        }

        Self {
            id: closure.root,
            name: closure.name,
            access,
            enabled_roles,
            roles_with_admin_option: closure.admin_roles,
        }
    }
}

/// Cached value with its insertion time
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub value: T,
    pub created_at: Instant,
}

impl<T> CacheEntry<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            created_at: Instant::now(),
        }
    }

    /// Entries are trusted strictly before `ttl` has elapsed
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() < ttl
    }
}

/// Lock-free counters updated on the resolution path
#[derive(Debug, Default)]
pub(super) struct AtomicRoleCacheStats {
    pub hits: AtomicU64,
    pub misses: AtomicU64,
    pub recomputations: AtomicU64,
    pub invalidations: AtomicU64,
}

impl AtomicRoleCacheStats {
    pub fn snapshot(&self, entries: usize) -> RoleCacheStats {
        RoleCacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            recomputations: self.recomputations.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
            entries,
        }
    }

    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.recomputations.store(0, Ordering::Relaxed);
        self.invalidations.store(0, Ordering::Relaxed);
    }
}

/// Role cache statistics snapshot
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RoleCacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Store reads performed to rebuild an entry
    pub recomputations: u64,
    pub invalidations: u64,
    /// Entries currently held, fresh or not
    pub entries: usize,
}

impl RoleCacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
