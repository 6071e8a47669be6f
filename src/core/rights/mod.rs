//! Access rights of a single principal and their union across principals
//!
//! A principal's rights are an ordered sequence of grants and partial revokes. A partial
//! revoke only shadows grants inserted before it; re-granting over it removes it.

mod effective;

pub use effective::EffectiveAccess;

use crate::core::models::{AccessType, GrantScope, Resource};
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};

/// One entry of a principal's grant sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRightsElement {
    pub access_type: AccessType,
    #[serde(flatten)]
    pub resource: Resource,
    #[serde(default)]
    pub grant_option: bool,
    #[serde(default)]
    pub is_partial_revoke: bool,
}

impl AccessRightsElement {
    fn grant(access_type: AccessType, resource: Resource, grant_option: bool) -> Self {
        Self {
            access_type,
            resource,
            grant_option,
            is_partial_revoke: false,
        }
    }

    fn partial_revoke(access_type: AccessType, resource: Resource) -> Self {
        Self {
            access_type,
            resource,
            grant_option: false,
            is_partial_revoke: true,
        }
    }
}

/// Ordered grants and partial revokes held directly by one principal
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessRights {
    elements: Vec<AccessRightsElement>,
}

impl AccessRights {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elements(&self) -> &[AccessRightsElement] {
        &self.elements
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Grant `access` on every resource of `scope`; returns whether anything changed
    pub fn grant(
        &mut self,
        access: AccessType,
        scope: &GrantScope,
        grant_option: bool,
    ) -> Result<bool> {
        scope.validate()?;
        access.check_level(scope.level())?;

        let mut changed = false;
        for resource in scope.resources() {
            changed |= self.grant_resource(access, resource, grant_option);
        }
        Ok(changed)
    }

    /// Revoke `access` on every resource of `scope`; returns whether anything changed
    pub fn revoke(&mut self, access: AccessType, scope: &GrantScope) -> Result<bool> {
        scope.validate()?;

        let mut changed = false;
        for resource in scope.resources() {
            changed |= self.revoke_resource(access, resource);
        }
        Ok(changed)
    }

    pub fn is_granted(&self, access: AccessType, resource: &Resource) -> bool {
        self.check(access, resource, false)
    }

    pub fn is_granted_with_grant_option(&self, access: AccessType, resource: &Resource) -> bool {
        self.check(access, resource, true)
    }

    fn check(&self, access: AccessType, resource: &Resource, need_grant_option: bool) -> bool {
        self.elements.iter().enumerate().any(|(index, element)| {
            !element.is_partial_revoke
                && element.access_type.implies(access)
                && element.resource.covers(resource)
                && (!need_grant_option || element.grant_option)
                && !self.elements[index + 1..].iter().any(|later| {
                    later.is_partial_revoke
                        && later.access_type.overlaps(access)
                        && later.resource.overlaps(resource)
                })
        })
    }

    fn grant_resource(
        &mut self,
        access: AccessType,
        resource: Resource,
        grant_option: bool,
    ) -> bool {
        let before = self.elements.len();

        // Partial revokes under the new grant are lifted by it.
        self.elements.retain(|element| {
            !(element.is_partial_revoke
                && access.implies(element.access_type)
                && resource.covers(&element.resource))
        });
        let mut changed = self.elements.len() != before;

        let existing = self.elements.iter().position(|element| {
            !element.is_partial_revoke
                && element.access_type == access
                && element.resource == resource
        });
        let present = match existing {
            Some(index) => {
                let existing = &mut self.elements[index];
                if grant_option && !existing.grant_option {
                    existing.grant_option = true;
                    changed = true;
                }
                true
            }
            None if self.check(access, &resource, grant_option) => false,
            None => {
                self.elements
                    .push(AccessRightsElement::grant(access, resource.clone(), grant_option));
                changed = true;
                true
            }
        };

        if present {
            let len = self.elements.len();
            self.elements.retain(|element| {
                element.is_partial_revoke
                    || (element.access_type == access && element.resource == resource)
                    || !(access.implies(element.access_type)
                        && resource.covers(&element.resource)
                        && (grant_option || !element.grant_option))
            });
            changed |= self.elements.len() != len;
        }

        changed
    }

    fn revoke_resource(&mut self, access: AccessType, resource: Resource) -> bool {
        let before = self.elements.clone();

        // Equal or narrower grants and partial revokes disappear outright.
        self.elements.retain(|element| {
            !(access.implies(element.access_type) && resource.covers(&element.resource))
        });

        let still_granted = self.elements.iter().any(|element| {
            !element.is_partial_revoke
                && element.access_type.overlaps(access)
                && element.resource.overlaps(&resource)
        });
        if still_granted {
            self.elements
                .push(AccessRightsElement::partial_revoke(access, resource));
        }

        self.elements != before
    }
}
