//! User management statements

use super::system::AccessControl;
use super::types::RoleSet;
use crate::core::introspection::format::quote_identifier;
use crate::core::models::{AccessType, GrantScope, PrincipalId, PrincipalKind};
use crate::core::session::Session;
use crate::utils::error::Result;

impl AccessControl {
    /// `CREATE USER [IF NOT EXISTS] name`
    pub fn create_user(&self, session: &Session, name: &str, if_not_exists: bool) -> Result<PrincipalId> {
        self.create_principal(session, PrincipalKind::User, name, if_not_exists)
    }

    /// `DROP USER [IF EXISTS] name`
    pub fn drop_user(&self, session: &Session, name: &str, if_exists: bool) -> Result<bool> {
        self.drop_principal(session, PrincipalKind::User, name, if_exists)
    }

    /// `SET DEFAULT ROLE ... TO user`
    ///
    /// Setting one's own default roles needs no privilege; anyone else's needs `ALTER USER`.
    pub fn set_default_roles(&self, session: &Session, user: &str, roles: RoleSet) -> Result<()> {
        let statement = format!(
            "SET DEFAULT ROLE {} TO {}",
            roles.render(),
            quote_identifier(user)
        );
        let enabled = self.enabled(session)?;
        let target = self
            .store
            .require(PrincipalKind::User, user)
            .map_err(|err| self.refused(session, &statement, err))?;
        if target.id != enabled.user {
            self.require_privilege(
                session,
                &enabled,
                AccessType::AlterUser,
                &GrantScope::Global,
                &statement,
            )?;
        }

        let result = roles
            .to_selection(&self.store)
            .and_then(|selection| self.store.set_default_roles(&target.id, selection));
        self.audited(session, &statement, result)
    }

    pub(super) fn create_principal(
        &self,
        session: &Session,
        kind: PrincipalKind,
        name: &str,
        if_not_exists: bool,
    ) -> Result<PrincipalId> {
        let statement = format!(
            "CREATE {}{} {}",
            kind.keyword(),
            if if_not_exists { " IF NOT EXISTS" } else { "" },
            quote_identifier(name)
        );
        let enabled = self.enabled(session)?;
        let required = match kind {
            PrincipalKind::User => AccessType::CreateUser,
            PrincipalKind::Role => AccessType::CreateRole,
        };
        self.require_privilege(session, &enabled, required, &GrantScope::Global, &statement)?;

        let result = self.store.create(kind, name, if_not_exists);
        self.audited(session, &statement, result)
    }

    pub(super) fn drop_principal(
        &self,
        session: &Session,
        kind: PrincipalKind,
        name: &str,
        if_exists: bool,
    ) -> Result<bool> {
        let statement = format!(
            "DROP {}{} {}",
            kind.keyword(),
            if if_exists { " IF EXISTS" } else { "" },
            quote_identifier(name)
        );
        let enabled = self.enabled(session)?;
        let required = match kind {
            PrincipalKind::User => AccessType::DropUser,
            PrincipalKind::Role => AccessType::DropRole,
        };
        self.require_privilege(session, &enabled, required, &GrantScope::Global, &statement)?;

        let result = self.store.drop_principal(kind, name, if_exists);
        self.audited(session, &statement, result)
    }
}
