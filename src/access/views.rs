//! Introspection statements, system tables and role functions
//!
//! A session always sees itself and its enabled roles. Other users need `SHOW USERS`,
//! other roles need `SHOW ROLES`. `SHOW` statements fail on what the session may not see;
//! system tables leave those rows out.

use super::system::AccessControl;
use crate::core::introspection::format::{create_statement, grant_statements};
use crate::core::introspection::{
    GrantRow, RoleGrantRow, RoleRow, UserRow, grant_rows, role_grant_rows, role_row, user_row,
};
use crate::core::models::{AccessType, GrantScope, Principal, PrincipalKind};
use crate::core::resolver::{EnabledAccess, PrivilegeResolver};
use crate::core::session::{CurrentRoleRow, EnabledRoleRow, Session};
use crate::utils::error::{AccessError, Result};

impl AccessControl {
    /// `SHOW GRANTS [FOR name]`
    pub fn show_grants(&self, session: &Session, name: Option<&str>) -> Result<Vec<String>> {
        let enabled = self.enabled(session)?;
        let target = match name {
            Some(name) => match self.store.find_any(name) {
                Some(principal) => principal,
                None => {
                    // Only a viewer able to list both kinds learns that the name is unknown.
                    Self::check_listing(&enabled, PrincipalKind::User)?;
                    Self::check_listing(&enabled, PrincipalKind::Role)?;
                    return Err(AccessError::unknown_principal(format!("`{}`", name)));
                }
            },
            None => self.store.get(session.user_id()).ok_or_else(|| {
                AccessError::unknown_principal(format!("user `{}`", session.user_name()))
            })?,
        };
        self.require_visible(&enabled, &target)?;
        Ok(self.grants_of(&target))
    }

    /// `SHOW ROLES`
    pub fn show_roles(&self, session: &Session) -> Result<Vec<String>> {
        self.require_listing(session, PrincipalKind::Role)?;
        Ok(self.names(PrincipalKind::Role))
    }

    /// `SHOW USERS`
    pub fn show_users(&self, session: &Session) -> Result<Vec<String>> {
        self.require_listing(session, PrincipalKind::User)?;
        Ok(self.names(PrincipalKind::User))
    }

    /// `SHOW CREATE ROLE names` or, without names, `SHOW CREATE ROLES`
    pub fn show_create_role(&self, session: &Session, names: Option<&[String]>) -> Result<Vec<String>> {
        self.show_create(session, PrincipalKind::Role, names)
    }

    /// `SHOW CREATE USER names` or, without names, `SHOW CREATE USERS`
    pub fn show_create_user(&self, session: &Session, names: Option<&[String]>) -> Result<Vec<String>> {
        self.show_create(session, PrincipalKind::User, names)
    }

    /// `SHOW ACCESS`: create statements of users then roles, then their grants
    pub fn show_access(&self, session: &Session) -> Result<Vec<String>> {
        self.require_listing(session, PrincipalKind::User)?;
        self.require_listing(session, PrincipalKind::Role)?;

        let users = self.store.list(PrincipalKind::User);
        let roles = self.store.list(PrincipalKind::Role);
        let mut statements: Vec<String> = users
            .iter()
            .chain(&roles)
            .map(create_statement)
            .collect();
        for principal in users.iter().chain(&roles) {
            statements.extend(self.grants_of(principal));
        }
        Ok(statements)
    }

    /// `SHOW CURRENT ROLES`
    pub fn show_current_roles(&self, session: &Session) -> Result<Vec<CurrentRoleRow>> {
        self.roles.current_role_rows(session)
    }

    /// `SHOW ENABLED ROLES`
    pub fn show_enabled_roles(&self, session: &Session) -> Result<Vec<EnabledRoleRow>> {
        self.roles.enabled_role_rows(session)
    }

    // ==================== System tables ====================

    pub fn system_roles(&self, session: &Session) -> Result<Vec<RoleRow>> {
        let enabled = self.enabled(session)?;
        let storage = self.store.storage_name();
        Ok(self
            .visible(&enabled, PrincipalKind::Role)
            .iter()
            .map(|role| role_row(role, storage))
            .collect())
    }

    pub fn system_users(&self, session: &Session) -> Result<Vec<UserRow>> {
        let enabled = self.enabled(session)?;
        let storage = self.store.storage_name();
        Ok(self
            .visible(&enabled, PrincipalKind::User)
            .iter()
            .map(|user| user_row(user, storage, |id| self.store.name_of(id)))
            .collect())
    }

    pub fn system_grants(&self, session: &Session) -> Result<Vec<GrantRow>> {
        let enabled = self.enabled(session)?;
        Ok(self
            .visible_principals(&enabled)
            .iter()
            .flat_map(grant_rows)
            .collect())
    }

    pub fn system_role_grants(&self, session: &Session) -> Result<Vec<RoleGrantRow>> {
        let enabled = self.enabled(session)?;
        Ok(self
            .visible_principals(&enabled)
            .iter()
            .flat_map(|principal| role_grant_rows(principal, |id| self.store.name_of(id)))
            .collect())
    }

    pub fn system_current_roles(&self, session: &Session) -> Result<Vec<CurrentRoleRow>> {
        self.show_current_roles(session)
    }

    pub fn system_enabled_roles(&self, session: &Session) -> Result<Vec<EnabledRoleRow>> {
        self.show_enabled_roles(session)
    }

    // ==================== Functions ====================

    /// `defaultRoles()`
    pub fn default_roles_of(&self, session: &Session) -> Result<Vec<String>> {
        self.roles.default_role_names(session)
    }

    /// `currentRoles()`
    pub fn current_roles_of(&self, session: &Session) -> Result<Vec<String>> {
        self.roles.current_role_names(session)
    }

    /// `enabledRoles()`
    pub fn enabled_roles_of(&self, session: &Session) -> Result<Vec<String>> {
        self.roles.enabled_role_names(session)
    }

    // ==================== Helpers ====================

    fn grants_of(&self, principal: &Principal) -> Vec<String> {
        grant_statements(principal, |id| self.store.name_of(id))
    }

    fn names(&self, kind: PrincipalKind) -> Vec<String> {
        self.store
            .list(kind)
            .into_iter()
            .map(|principal| principal.name)
            .collect()
    }

    fn show_create(
        &self,
        session: &Session,
        kind: PrincipalKind,
        names: Option<&[String]>,
    ) -> Result<Vec<String>> {
        let Some(names) = names else {
            self.require_listing(session, kind)?;
            return Ok(self.store.list(kind).iter().map(create_statement).collect());
        };

        let enabled = self.enabled(session)?;
        names
            .iter()
            .map(|name| {
                let principal = self.store.require(kind, name).or_else(|err| {
                    Self::check_listing(&enabled, kind)?;
                    Err(err)
                })?;
                self.require_visible(&enabled, &principal)?;
                Ok(create_statement(&principal))
            })
            .collect()
    }

    fn listing_privilege(kind: PrincipalKind) -> AccessType {
        match kind {
            PrincipalKind::User => AccessType::ShowUsers,
            PrincipalKind::Role => AccessType::ShowRoles,
        }
    }

    fn require_listing(&self, session: &Session, kind: PrincipalKind) -> Result<()> {
        let enabled = self.enabled(session)?;
        Self::check_listing(&enabled, kind)
    }

    fn check_listing(enabled: &EnabledAccess, kind: PrincipalKind) -> Result<()> {
        PrivilegeResolver::check(enabled, Self::listing_privilege(kind), &GrantScope::Global)
    }

    fn is_visible(enabled: &EnabledAccess, principal: &Principal) -> bool {
        principal.id == enabled.user
            || enabled.is_role_enabled(&principal.id)
            || enabled.is_granted(Self::listing_privilege(principal.kind), &GrantScope::Global)
    }

    fn require_visible(&self, enabled: &EnabledAccess, principal: &Principal) -> Result<()> {
        if Self::is_visible(enabled, principal) {
            Ok(())
        } else {
            Self::check_listing(enabled, principal.kind)
        }
    }

    fn visible(&self, enabled: &EnabledAccess, kind: PrincipalKind) -> Vec<Principal> {
        self.store
            .list(kind)
            .into_iter()
            .filter(|principal| Self::is_visible(enabled, principal))
            .collect()
    }

    /// Visible users then visible roles, each sorted by name
    fn visible_principals(&self, enabled: &EnabledAccess) -> Vec<Principal> {
        let mut principals = self.visible(enabled, PrincipalKind::User);
        principals.extend(self.visible(enabled, PrincipalKind::Role));
        principals
    }
}
