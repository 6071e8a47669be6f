//! Entity store: the authoritative definitions of users, roles and grants
//!
//! All mutations run under a single write lock. Observers are told which principals
//! changed once the lock is released and before the mutating call returns.

mod entities;
mod persistence;

pub use entities::RoleClosure;

use crate::core::models::{
    AccessType, GrantScope, Principal, PrincipalId, PrincipalKind, RoleSelection,
};
use crate::utils::error::{AccessError, Result};
use entities::Entities;
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Receives change notifications for mutated principals
pub trait EntityObserver: Send + Sync {
    fn entity_changed(&self, id: &PrincipalId);
}

/// Storage of principal definitions
pub struct EntityStore {
    entities: RwLock<Entities>,
    observers: RwLock<Vec<Arc<dyn EntityObserver>>>,
    snapshot_path: Option<PathBuf>,
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl EntityStore {
    /// Create a store that lives in memory only
    pub fn in_memory() -> Self {
        Self {
            entities: RwLock::new(Entities::default()),
            observers: RwLock::new(Vec::new()),
            snapshot_path: None,
        }
    }

    /// Open a store persisted as a snapshot file in `directory`
    pub fn open<P: AsRef<Path>>(directory: P) -> Result<Self> {
        let directory = directory.as_ref();
        std::fs::create_dir_all(directory)?;
        let path = directory.join(persistence::SNAPSHOT_FILE);

        let entities = match persistence::load(&path)? {
            Some(entities) => {
                info!(
                    "Loaded {} access entities from {:?}",
                    entities.len(),
                    path
                );
                entities
            }
            None => Entities::default(),
        };

        Ok(Self {
            entities: RwLock::new(entities),
            observers: RwLock::new(Vec::new()),
            snapshot_path: Some(path),
        })
    }

    /// Storage name reported by introspection
    pub fn storage_name(&self) -> &'static str {
        if self.snapshot_path.is_some() {
            "local directory"
        } else {
            "memory"
        }
    }

    pub fn subscribe(&self, observer: Arc<dyn EntityObserver>) {
        self.observers.write().push(observer);
    }

    // ==================== Reads ====================

    pub fn get(&self, id: &PrincipalId) -> Option<Principal> {
        self.entities.read().get(id).cloned()
    }

    pub fn find(&self, kind: PrincipalKind, name: &str) -> Option<Principal> {
        self.entities.read().by_name(kind, name).cloned()
    }

    /// Look a grantee up by name, preferring a user over a role of the same name
    pub fn find_any(&self, name: &str) -> Option<Principal> {
        let entities = self.entities.read();
        entities
            .by_name(PrincipalKind::User, name)
            .or_else(|| entities.by_name(PrincipalKind::Role, name))
            .cloned()
    }

    /// Look a principal up, failing with `UnknownRole` or `UnknownPrincipal`
    pub fn require(&self, kind: PrincipalKind, name: &str) -> Result<Principal> {
        self.find(kind, name).ok_or_else(|| match kind {
            PrincipalKind::Role => AccessError::unknown_role(name),
            PrincipalKind::User => AccessError::unknown_principal(format!("user `{}`", name)),
        })
    }

    pub fn require_any(&self, name: &str) -> Result<Principal> {
        self.find_any(name)
            .ok_or_else(|| AccessError::unknown_principal(format!("`{}`", name)))
    }

    /// All principals of one kind, sorted by name
    pub fn list(&self, kind: PrincipalKind) -> Vec<Principal> {
        let mut principals: Vec<Principal> = self
            .entities
            .read()
            .iter()
            .filter(|principal| principal.kind == kind)
            .cloned()
            .collect();
        principals.sort_by(|a, b| a.name.cmp(&b.name));
        principals
    }

    pub fn name_of(&self, id: &PrincipalId) -> Option<String> {
        self.entities.read().get(id).map(|principal| principal.name.clone())
    }

    /// Names of `ids` in the given order; unknown ids are skipped
    pub fn names_of<'a, I>(&self, ids: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a PrincipalId>,
    {
        let entities = self.entities.read();
        ids.into_iter()
            .filter_map(|id| entities.get(id).map(|principal| principal.name.clone()))
            .collect()
    }

    /// Every role reachable from `role`, read in one pass
    pub fn role_closure(&self, role: &PrincipalId) -> Option<RoleClosure> {
        self.entities.read().role_closure(role)
    }

    pub fn len(&self) -> usize {
        self.entities.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ==================== Mutations ====================

    /// Create a user or role; with `if_not_exists` an existing one is kept
    pub fn create(&self, kind: PrincipalKind, name: &str, if_not_exists: bool) -> Result<PrincipalId> {
        if name.trim().is_empty() {
            return Err(AccessError::validation(format!("Empty {} name", kind)));
        }

        self.mutate(|entities| {
            if let Some(existing) = entities.by_name(kind, name) {
                if if_not_exists {
                    return Ok((existing.id, Vec::new()));
                }
                return Err(AccessError::already_exists(existing.label()));
            }

            let principal = Principal::new(kind, name);
            let id = principal.id;
            entities.insert(principal);
            debug!("Created {} {}", kind, name);
            Ok((id, vec![id]))
        })
    }

    pub fn create_user(&self, name: &str, if_not_exists: bool) -> Result<PrincipalId> {
        self.create(PrincipalKind::User, name, if_not_exists)
    }

    pub fn create_role(&self, name: &str, if_not_exists: bool) -> Result<PrincipalId> {
        self.create(PrincipalKind::Role, name, if_not_exists)
    }

    /// Drop a user or role together with every edge that references it
    pub fn drop_principal(&self, kind: PrincipalKind, name: &str, if_exists: bool) -> Result<bool> {
        self.mutate(|entities| {
            let id = match entities.by_name(kind, name) {
                Some(principal) => principal.id,
                None if if_exists => return Ok((false, Vec::new())),
                None => {
                    return Err(AccessError::does_not_exist(format!("{} `{}`", kind, name)));
                }
            };

            let mut changed = entities.detach_role(&id);
            entities.remove(&id);
            changed.push(id);
            debug!("Dropped {} {}", kind, name);
            Ok((true, changed))
        })
    }

    pub fn grant_privilege(
        &self,
        grantee: &PrincipalId,
        access: AccessType,
        scope: &GrantScope,
        grant_option: bool,
    ) -> Result<bool> {
        self.mutate(|entities| {
            let principal = entities.require_mut(grantee)?;
            let changed = Arc::make_mut(&mut principal.access).grant(access, scope, grant_option)?;
            Ok((changed, changed_ids(changed, grantee)))
        })
    }

    pub fn revoke_privilege(
        &self,
        grantee: &PrincipalId,
        access: AccessType,
        scope: &GrantScope,
    ) -> Result<bool> {
        self.mutate(|entities| {
            let principal = entities.require_mut(grantee)?;
            let changed = Arc::make_mut(&mut principal.access).revoke(access, scope)?;
            Ok((changed, changed_ids(changed, grantee)))
        })
    }

    /// Grant `role` to `grantee`, refusing edges that would close a cycle
    pub fn grant_role(
        &self,
        role: &PrincipalId,
        grantee: &PrincipalId,
        admin_option: bool,
    ) -> Result<bool> {
        self.grant_roles(std::slice::from_ref(role), std::slice::from_ref(grantee), admin_option)
    }

    /// Grant every role to every grantee, or nothing if any edge is invalid
    ///
    /// Every pair is checked against the current graph before the first edge is added.
    /// Since the full cross product is added, a cycle through several new edges always
    /// contains one pair whose role already reaches its grantee.
    pub fn grant_roles(
        &self,
        roles: &[PrincipalId],
        grantees: &[PrincipalId],
        admin_option: bool,
    ) -> Result<bool> {
        self.mutate(|entities| {
            for role in roles {
                let role_name = match entities.get(role) {
                    Some(principal) if principal.is_role() => principal.name.clone(),
                    _ => return Err(AccessError::unknown_role(role.to_string())),
                };
                for grantee in grantees {
                    entities.require(grantee)?;
                    if entities.reaches(role, grantee) {
                        let grantee_name = entities
                            .get(grantee)
                            .map(|principal| principal.name.clone())
                            .unwrap_or_default();
                        return Err(AccessError::validation(format!(
                            "Role {} cannot be granted to {}: it would create a cycle",
                            role_name, grantee_name
                        )));
                    }
                }
            }

            let mut changed = Vec::new();
            for grantee in grantees {
                let principal = entities.require_mut(grantee)?;
                let mut touched = false;
                for role in roles {
                    touched |= principal.granted_roles.grant(*role, admin_option);
                }
                if touched && !changed.contains(grantee) {
                    changed.push(*grantee);
                }
            }
            Ok((!changed.is_empty(), changed))
        })
    }

    /// Revoke `role` from `grantee`, or only its admin option
    pub fn revoke_role(
        &self,
        role: &PrincipalId,
        grantee: &PrincipalId,
        admin_option_only: bool,
    ) -> Result<bool> {
        self.mutate(|entities| {
            let principal = entities.require_mut(grantee)?;
            let changed = if admin_option_only {
                principal.granted_roles.revoke_admin_option(role)
            } else {
                let revoked = principal.granted_roles.revoke(role);
                if let RoleSelection::Explicit(ids) = &mut principal.default_roles {
                    ids.retain(|id| id != role);
                }
                revoked
            };
            Ok((changed, changed_ids(changed, grantee)))
        })
    }

    /// Replace the default-role selection of a user
    pub fn set_default_roles(&self, user: &PrincipalId, selection: RoleSelection) -> Result<()> {
        self.mutate(|entities| {
            let principal = entities.require(user)?;
            if !principal.is_user() {
                return Err(AccessError::validation(format!(
                    "Default roles can only be set for users, not for {}",
                    principal.label()
                )));
            }
            if let RoleSelection::Explicit(ids) = &selection {
                if let Some(missing) = ids.iter().find(|id| !principal.granted_roles.contains(id)) {
                    let role_name = entities
                        .get(missing)
                        .map(|role| role.name.clone())
                        .unwrap_or_else(|| missing.to_string());
                    return Err(AccessError::unknown_role(format!(
                        "Role {} is not granted to {}",
                        role_name, principal.name
                    )));
                }
            }

            entities.require_mut(user)?.default_roles = selection;
            Ok(((), vec![*user]))
        })
    }

    /// Apply `f` under the write lock, persist, then notify observers of changed ids
    fn mutate<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Entities) -> Result<(T, Vec<PrincipalId>)>,
    {
        let (value, changed) = {
            let mut entities = self.entities.write();
            match &self.snapshot_path {
                Some(path) => {
                    let mut draft = entities.clone();
                    let (value, changed) = f(&mut draft)?;
                    if !changed.is_empty() {
                        persistence::save(path, &draft)?;
                    }
                    *entities = draft;
                    (value, changed)
                }
                None => f(&mut entities)?,
            }
        };

        if !changed.is_empty() {
            let observers = self.observers.read().clone();
            for id in &changed {
                for observer in &observers {
                    observer.entity_changed(id);
                }
            }
        }
        Ok(value)
    }
}

fn changed_ids(changed: bool, id: &PrincipalId) -> Vec<PrincipalId> {
    if changed { vec![*id] } else { Vec::new() }
}
