//! Union of several principals' access rights

use super::AccessRights;
use crate::core::models::{AccessType, GrantScope, PrincipalId, Resource};
use std::sync::Arc;

/// Access rights of a user combined with those of its enabled roles
///
/// Each component is evaluated on its own: a partial revoke held by one role never
/// shadows a grant held by another.
#[derive(Debug, Clone, Default)]
pub struct EffectiveAccess {
    parts: Vec<(PrincipalId, Arc<AccessRights>)>,
}

impl EffectiveAccess {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, owner: PrincipalId, rights: Arc<AccessRights>) {
        if !self.parts.iter().any(|(id, _)| *id == owner) {
            self.parts.push((owner, rights));
        }
    }

    pub fn extend(&mut self, other: &EffectiveAccess) {
        for (owner, rights) in &other.parts {
            self.add(*owner, Arc::clone(rights));
        }
    }

    pub fn owners(&self) -> impl Iterator<Item = &PrincipalId> {
        self.parts.iter().map(|(id, _)| id)
    }

    /// Whether every resource addressed by `scope` is allowed
    pub fn is_granted(&self, access: AccessType, scope: &GrantScope) -> bool {
        scope
            .resources()
            .iter()
            .all(|resource| self.allows(access, resource, false))
    }

    pub fn is_granted_with_grant_option(&self, access: AccessType, scope: &GrantScope) -> bool {
        scope
            .resources()
            .iter()
            .all(|resource| self.allows(access, resource, true))
    }

    /// Resources of `scope` that are not allowed
    pub fn missing(&self, access: AccessType, scope: &GrantScope) -> Vec<Resource> {
        scope
            .resources()
            .into_iter()
            .filter(|resource| !self.allows(access, resource, false))
            .collect()
    }

    fn allows(&self, access: AccessType, resource: &Resource, need_grant_option: bool) -> bool {
        self.parts.iter().any(|(_, rights)| {
            if need_grant_option {
                rights.is_granted_with_grant_option(access, resource)
            } else {
                rights.is_granted(access, resource)
            }
        })
    }
}
