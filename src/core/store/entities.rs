//! In-memory entity tables behind the store lock

use crate::core::models::{Principal, PrincipalId, PrincipalKind};
use crate::core::rights::AccessRights;
use crate::utils::error::{AccessError, Result};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

/// A role together with every role reachable from it
#[derive(Debug, Clone)]
pub struct RoleClosure {
    pub root: PrincipalId,
    pub name: String,
    /// Reachable roles in breadth-first order, root first
    pub members: Vec<(PrincipalId, Arc<AccessRights>)>,
    /// Roles granted with admin option to any member
    pub admin_roles: HashSet<PrincipalId>,
}

#[derive(Debug, Clone, Default)]
pub(super) struct Entities {
    principals: HashMap<PrincipalId, Principal>,
    /// Names are unique within a kind; a user and a role may share one
    names: HashMap<(PrincipalKind, String), PrincipalId>,
}

impl Entities {
    pub(super) fn from_principals(principals: Vec<Principal>) -> Result<Self> {
        let mut entities = Self::default();
        for principal in principals {
            if entities.by_name(principal.kind, &principal.name).is_some() {
                return Err(AccessError::storage(format!(
                    "Duplicate name in snapshot: {}",
                    principal.label()
                )));
            }
            entities.insert(principal);
        }
        Ok(entities)
    }

    pub(super) fn len(&self) -> usize {
        self.principals.len()
    }

    pub(super) fn iter(&self) -> impl Iterator<Item = &Principal> {
        self.principals.values()
    }

    pub(super) fn get(&self, id: &PrincipalId) -> Option<&Principal> {
        self.principals.get(id)
    }

    pub(super) fn require(&self, id: &PrincipalId) -> Result<&Principal> {
        self.principals
            .get(id)
            .ok_or_else(|| AccessError::unknown_principal(id.to_string()))
    }

    pub(super) fn require_mut(&mut self, id: &PrincipalId) -> Result<&mut Principal> {
        self.principals
            .get_mut(id)
            .ok_or_else(|| AccessError::unknown_principal(id.to_string()))
    }

    pub(super) fn by_name(&self, kind: PrincipalKind, name: &str) -> Option<&Principal> {
        self.names
            .get(&(kind, name.to_string()))
            .and_then(|id| self.principals.get(id))
    }

    pub(super) fn insert(&mut self, principal: Principal) {
        self.names
            .insert((principal.kind, principal.name.clone()), principal.id);
        self.principals.insert(principal.id, principal);
    }

    pub(super) fn remove(&mut self, id: &PrincipalId) -> Option<Principal> {
        let removed = self.principals.remove(id)?;
        self.names.remove(&(removed.kind, removed.name.clone()));
        Some(removed)
    }

    /// Remove every edge and default-role mention of `role`; returns the principals touched
    pub(super) fn detach_role(&mut self, role: &PrincipalId) -> Vec<PrincipalId> {
        let mut touched = Vec::new();
        for principal in self.principals.values_mut() {
            let revoked = principal.granted_roles.revoke(role);
            let before = principal.default_roles.clone();
            principal.default_roles.forget(role);
            if revoked || before != principal.default_roles {
                touched.push(principal.id);
            }
        }
        touched
    }

    /// Whether `target` is `from` or reachable from it through granted roles
    pub(super) fn reaches(&self, from: &PrincipalId, target: &PrincipalId) -> bool {
        self.walk(from).iter().any(|id| id == target)
    }

    pub(super) fn role_closure(&self, root: &PrincipalId) -> Option<RoleClosure> {
        let role = self.principals.get(root).filter(|p| p.is_role())?;

        let mut members = Vec::new();
        let mut admin_roles = HashSet::new();
        for id in self.walk(root) {
            if let Some(member) = self.principals.get(&id) {
                members.push((id, Arc::clone(&member.access)));
                admin_roles.extend(
                    member
                        .granted_roles
                        .iter()
                        .filter(|granted| granted.admin_option)
                        .map(|granted| granted.role),
                );
            }
        }

        Some(RoleClosure {
            root: *root,
            name: role.name.clone(),
            members,
            admin_roles,
        })
    }

    /// Breadth-first walk over granted roles; the visited set stops cycles
    fn walk(&self, from: &PrincipalId) -> Vec<PrincipalId> {
        let mut visited = HashSet::new();
        let mut order = Vec::new();
        let mut queue = VecDeque::from([*from]);

        while let Some(id) = queue.pop_front() {
            if !visited.insert(id) {
                continue;
            }
            let Some(principal) = self.principals.get(&id) else {
                continue;
            };
            order.push(id);
            queue.extend(principal.granted_roles.ids().copied());
        }
        order
    }
}
