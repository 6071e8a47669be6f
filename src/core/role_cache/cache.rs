//! Role cache implementation

use super::types::{AtomicRoleCacheStats, CacheEntry, ResolvedRole, RoleCacheStats};
use crate::core::models::PrincipalId;
use crate::core::store::{EntityObserver, EntityStore};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tracing::debug;

/// Time-bounded cache of resolved roles
///
/// The cache never owns the store: callers pass it to [`RoleCache::resolve`], and the store
/// reports mutations through [`EntityObserver`].
pub struct RoleCache {
    entries: DashMap<PrincipalId, CacheEntry<Arc<ResolvedRole>>>,
    /// Per-role single-flight locks
    flights: DashMap<PrincipalId, Arc<Mutex<()>>>,
    /// Bumped by every invalidation of a role
    epochs: DashMap<PrincipalId, u64>,
    ttl: Duration,
    stats: AtomicRoleCacheStats,
}

impl RoleCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            flights: DashMap::new(),
            epochs: DashMap::new(),
            ttl,
            stats: AtomicRoleCacheStats::default(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Resolve a role, rebuilding it from `store` when missing or older than the TTL
    ///
    /// Returns `None` for a role that no longer exists.
    pub fn resolve(&self, store: &EntityStore, role: &PrincipalId) -> Option<Arc<ResolvedRole>> {
        if let Some(resolved) = self.fresh(role) {
            self.stats.hits.fetch_add(1, Ordering::Relaxed);
            return Some(resolved);
        }
        self.stats.misses.fetch_add(1, Ordering::Relaxed);

        let flight = Arc::clone(self.flights.entry(*role).or_default().value());
        let guard = flight.lock();

        // Another caller may have rebuilt the entry while we waited.
        if let Some(resolved) = self.fresh(role) {
            return Some(resolved);
        }

        let started_at = self.epoch(role);
        self.stats.recomputations.fetch_add(1, Ordering::Relaxed);
        let Some(closure) = store.role_closure(role) else {
            self.entries.remove(role);
            drop(guard);
            drop(flight);
            self.prune_idle();
            return None;
        };
        let resolved = Arc::new(ResolvedRole::from(closure));
        debug!(
            "Resolved role {} through {} roles",
            resolved.name,
            resolved.enabled_roles.len()
        );

        self.purge_expired();
        let epoch = self.epochs.entry(*role).or_insert(0);
        if *epoch == started_at {
            self.entries
                .insert(*role, CacheEntry::new(Arc::clone(&resolved)));
        } else {
            debug!("Role {} changed while resolving; result not cached", resolved.name);
        }
        drop(epoch);

        Some(resolved)
    }

    /// Drop the entry of one role; in-flight rebuilds started earlier are not cached
    ///
    /// Expired entries of other roles are purged on the way.
    pub fn invalidate(&self, role: &PrincipalId) {
        self.purge_expired();
        // A rebuild registers its flight before reading the store, so without one
        // nothing in progress can have read the old state.
        if self.flights.contains_key(role) {
            let mut epoch = self.epochs.entry(*role).or_insert(0);
            *epoch += 1;
            self.entries.remove(role);
            drop(epoch);
        } else {
            self.entries.remove(role);
        }
        self.stats.invalidations.fetch_add(1, Ordering::Relaxed);
    }

    /// Remove entries older than the TTL; returns how many were removed
    ///
    /// Flight locks nobody holds and their epochs are forgotten as well.
    pub fn purge_expired(&self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_fresh(self.ttl));
        self.prune_idle();
        before.saturating_sub(self.entries.len())
    }

    /// Forget every entry
    pub fn clear(&self) {
        self.entries.clear();
        self.stats.reset();
        debug!("Role cache cleared");
    }

    pub fn stats(&self) -> RoleCacheStats {
        self.stats.snapshot(self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn fresh(&self, role: &PrincipalId) -> Option<Arc<ResolvedRole>> {
        self.entries
            .get(role)
            .filter(|entry| entry.is_fresh(self.ttl))
            .map(|entry| Arc::clone(&entry.value))
    }

    fn epoch(&self, role: &PrincipalId) -> u64 {
        self.epochs.get(role).map(|epoch| *epoch).unwrap_or(0)
    }

    /// Lock order is epochs, then flights
    fn prune_idle(&self) {
        self.flights.retain(|_, flight| Arc::strong_count(flight) > 1);
        self.epochs.retain(|role, _| self.flights.contains_key(role));
    }

    /// Flight locks and epochs currently tracked
    #[cfg(test)]
    pub(super) fn tracked(&self) -> (usize, usize) {
        (self.flights.len(), self.epochs.len())
    }
}

impl EntityObserver for RoleCache {
    fn entity_changed(&self, id: &PrincipalId) {
        self.invalidate(id);
    }
}
