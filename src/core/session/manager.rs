//! Role activation, current, default and enabled roles of a session

use super::{Session, SetRole};
use crate::core::models::{Principal, PrincipalId, PrincipalKind, RoleSelection};
use crate::core::resolver::{EnabledAccess, PrivilegeResolver};
use crate::utils::error::{AccessError, Result};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Row of `SHOW CURRENT ROLES` / `system.current_roles`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentRoleRow {
    pub role_name: String,
    pub with_admin_option: bool,
    pub is_default: bool,
}

/// Row of `SHOW ENABLED ROLES` / `system.enabled_roles`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnabledRoleRow {
    pub role_name: String,
    pub with_admin_option: bool,
    pub is_current: bool,
    pub is_default: bool,
}

/// Evaluates role activation against the live entity store
pub struct SessionRoleManager {
    resolver: Arc<PrivilegeResolver>,
}

impl SessionRoleManager {
    pub fn new(resolver: Arc<PrivilegeResolver>) -> Self {
        Self { resolver }
    }

    /// Apply `SET ROLE` to a session
    pub fn set_role(&self, session: &Session, request: SetRole) -> Result<()> {
        let user = self.user(session)?;
        let activation = match request {
            SetRole::Roles(names) => RoleSelection::Explicit(self.granted_ids(&user, &names)?),
            SetRole::None => RoleSelection::none(),
            SetRole::Default => RoleSelection::Explicit(user.default_role_ids()),
            SetRole::All => RoleSelection::All,
            SetRole::AllExcept(names) => RoleSelection::AllExcept(self.role_ids(&names)?),
        };
        debug!("Session of {} activates {:?}", user.name, activation);
        session.set_activation(activation);
        Ok(())
    }

    /// Granted roles of the user selected by the session's activation
    pub fn current_roles(&self, session: &Session) -> Result<Vec<PrincipalId>> {
        let user = self.user(session)?;
        Ok(session.activation().filter(user.granted_roles.ids()))
    }

    /// Granted roles of the user selected by its current default-role setting
    pub fn default_roles(&self, session: &Session) -> Result<Vec<PrincipalId>> {
        Ok(self.user(session)?.default_role_ids())
    }

    pub fn enabled_access(&self, session: &Session) -> Result<EnabledAccess> {
        let current = self.current_roles(session)?;
        self.resolver.enabled_access(session.user_id(), &current)
    }

    pub fn enabled_roles(&self, session: &Session) -> Result<Vec<PrincipalId>> {
        Ok(self.enabled_access(session)?.enabled_roles)
    }

    pub fn default_role_names(&self, session: &Session) -> Result<Vec<String>> {
        Ok(self.sorted_names(&self.default_roles(session)?))
    }

    pub fn current_role_names(&self, session: &Session) -> Result<Vec<String>> {
        Ok(self.sorted_names(&self.current_roles(session)?))
    }

    pub fn enabled_role_names(&self, session: &Session) -> Result<Vec<String>> {
        Ok(self.sorted_names(&self.enabled_roles(session)?))
    }

    pub fn current_role_rows(&self, session: &Session) -> Result<Vec<CurrentRoleRow>> {
        let user = self.user(session)?;
        let defaults = user.default_role_ids();
        let mut rows: Vec<CurrentRoleRow> = self
            .current_roles(session)?
            .into_iter()
            .filter_map(|id| {
                let role_name = self.resolver.store().name_of(&id)?;
                Some(CurrentRoleRow {
                    role_name,
                    with_admin_option: user.granted_roles.has_admin_option(&id),
                    is_default: defaults.contains(&id),
                })
            })
            .collect();
        rows.sort_by(|a, b| a.role_name.cmp(&b.role_name));
        Ok(rows)
    }

    pub fn enabled_role_rows(&self, session: &Session) -> Result<Vec<EnabledRoleRow>> {
        let user = self.user(session)?;
        let defaults = user.default_role_ids();
        let enabled = self.enabled_access(session)?;
        let mut rows: Vec<EnabledRoleRow> = enabled
            .enabled_roles
            .iter()
            .filter_map(|id| {
                let role_name = self.resolver.store().name_of(id)?;
                Some(EnabledRoleRow {
                    role_name,
                    with_admin_option: enabled.has_admin_option(id),
                    is_current: enabled.current_roles.contains(id),
                    is_default: defaults.contains(id),
                })
            })
            .collect();
        rows.sort_by(|a, b| a.role_name.cmp(&b.role_name));
        Ok(rows)
    }

    fn user(&self, session: &Session) -> Result<Principal> {
        self.resolver.store().get(session.user_id()).ok_or_else(|| {
            AccessError::unknown_principal(format!("user `{}`", session.user_name()))
        })
    }

    fn role_ids(&self, names: &[String]) -> Result<Vec<PrincipalId>> {
        names
            .iter()
            .map(|name| {
                self.resolver
                    .store()
                    .require(PrincipalKind::Role, name)
                    .map(|role| role.id)
            })
            .collect()
    }

    /// Resolve role names, each of which must be granted to `user`
    fn granted_ids(&self, user: &Principal, names: &[String]) -> Result<Vec<PrincipalId>> {
        let ids = self.role_ids(names)?;
        if let Some((name, _)) = names
            .iter()
            .zip(&ids)
            .find(|(_, id)| !user.granted_roles.contains(id))
        {
            return Err(AccessError::unknown_role(format!(
                "Role {} is not granted to {}",
                name, user.name
            )));
        }
        Ok(ids)
    }

    fn sorted_names(&self, ids: &[PrincipalId]) -> Vec<String> {
        let mut names = self.resolver.store().names_of(ids);
        names.sort();
        names
    }
}
