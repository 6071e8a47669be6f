//! Privilege resolution for a user and its current roles


use crate::core::introspection::format::format_privilege;
use crate::core::models::{AccessType, GrantScope, PrincipalId};
use crate::core::rights::EffectiveAccess;
use crate::core::role_cache::RoleCache;
use crate::core::store::EntityStore;
use crate::utils::error::{AccessError, Result};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Everything a user may do with a given set of current roles
#[derive(Debug, Clone)]
pub struct EnabledAccess {
    pub user: PrincipalId,
    pub user_name: String,
    pub current_roles: Vec<PrincipalId>,
    /// Closure of the current roles, without duplicates
    pub enabled_roles: Vec<PrincipalId>,
    /// Direct admin edges of the user plus those of every enabled role
    pub roles_with_admin_option: HashSet<PrincipalId>,
    pub access: EffectiveAccess,
}

impl EnabledAccess {
    pub fn is_granted(&self, access: AccessType, scope: &GrantScope) -> bool {
        self.access.is_granted(access, scope)
    }

    pub fn is_granted_with_grant_option(&self, access: AccessType, scope: &GrantScope) -> bool {
        self.access.is_granted_with_grant_option(access, scope)
    }

    pub fn is_role_enabled(&self, role: &PrincipalId) -> bool {
        self.enabled_roles.contains(role)
    }

    pub fn has_admin_option(&self, role: &PrincipalId) -> bool {
        self.roles_with_admin_option.contains(role)
    }
}

/// Combines a user's own grants with its resolved current roles
pub struct PrivilegeResolver {
    store: Arc<EntityStore>,
    cache: Arc<RoleCache>,
}

impl PrivilegeResolver {
    pub fn new(store: Arc<EntityStore>, cache: Arc<RoleCache>) -> Self {
        Self { store, cache }
    }

    pub fn store(&self) -> &Arc<EntityStore> {
        &self.store
    }

    pub fn cache(&self) -> &Arc<RoleCache> {
        &self.cache
    }

    /// Build the enabled access of `user` with `current_roles` active
    ///
    /// Current roles that no longer exist are skipped.
    pub fn enabled_access(
        &self,
        user: &PrincipalId,
        current_roles: &[PrincipalId],
    ) -> Result<EnabledAccess> {
        let principal = self
            .store
            .get(user)
            .ok_or_else(|| AccessError::unknown_principal(user.to_string()))?;

        let mut access = EffectiveAccess::new();
        access.add(principal.id, Arc::clone(&principal.access));

        let mut roles_with_admin_option: HashSet<PrincipalId> = principal
            .granted_roles
            .iter()
            .filter(|granted| granted.admin_option)
            .map(|granted| granted.role)
            .collect();

        let mut enabled_roles = Vec::new();
        let mut seen = HashSet::new();
        let mut resolved_current = Vec::with_capacity(current_roles.len());
        for role in current_roles {
            let Some(resolved) = self.cache.resolve(&self.store, role) else {
                debug!("Current role {} no longer exists", role);
                continue;
            };
            resolved_current.push(*role);
            access.extend(&resolved.access);
            roles_with_admin_option.extend(resolved.roles_with_admin_option.iter().copied());
            for id in &resolved.enabled_roles {
                if seen.insert(*id) {
                    enabled_roles.push(*id);
                }
            }
        }

        Ok(EnabledAccess {
            user: principal.id,
            user_name: principal.name,
            current_roles: resolved_current,
            enabled_roles,
            roles_with_admin_option,
            access,
        })
    }

    pub fn has_privilege(
        &self,
        user: &PrincipalId,
        current_roles: &[PrincipalId],
        access: AccessType,
        scope: &GrantScope,
    ) -> Result<bool> {
        Ok(self
            .enabled_access(user, current_roles)?
            .is_granted(access, scope))
    }

    /// Fail with `InsufficientPrivilege` unless `access` on `scope` is granted
    pub fn check_privilege(
        &self,
        user: &PrincipalId,
        current_roles: &[PrincipalId],
        access: AccessType,
        scope: &GrantScope,
    ) -> Result<()> {
        let enabled = self.enabled_access(user, current_roles)?;
        Self::check(&enabled, access, scope)
    }

    /// Check an already built [`EnabledAccess`]
    pub fn check(enabled: &EnabledAccess, access: AccessType, scope: &GrantScope) -> Result<()> {
        if enabled.is_granted(access, scope) {
            Ok(())
        } else {
            debug!(
                "{} lacks {}",
                enabled.user_name,
                format_privilege(access, scope)
            );
            Err(AccessError::missing_grant(&format_privilege(access, scope)))
        }
    }

    pub fn can_grant(enabled: &EnabledAccess, access: AccessType, scope: &GrantScope) -> bool {
        enabled.is_granted_with_grant_option(access, scope)
    }

    /// Fail unless `access` on `scope` is held with grant option
    pub fn check_grant_option(
        enabled: &EnabledAccess,
        access: AccessType,
        scope: &GrantScope,
    ) -> Result<()> {
        if Self::can_grant(enabled, access, scope) {
            Ok(())
        } else {
            Err(AccessError::missing_grant(&format!(
                "{} WITH GRANT OPTION",
                format_privilege(access, scope)
            )))
        }
    }

    /// `ROLE ADMIN` on `*.*` or the admin option on `role`
    pub fn can_grant_role(enabled: &EnabledAccess, role: &PrincipalId) -> bool {
        enabled.is_granted(AccessType::RoleAdmin, &GrantScope::Global) || enabled.has_admin_option(role)
    }

    /// Fail unless the acting principal may grant or revoke `role`
    pub fn check_admin_option(
        &self,
        enabled: &EnabledAccess,
        role: &PrincipalId,
    ) -> Result<()> {
        if Self::can_grant_role(enabled, role) {
            return Ok(());
        }
        let role_name = self
            .store
            .name_of(role)
            .unwrap_or_else(|| role.to_string());
        Err(AccessError::missing_admin_option(
            &role_name,
            enabled.is_role_enabled(role),
        ))
    }
}
