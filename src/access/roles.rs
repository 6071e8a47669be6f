//! Role management statements

use super::system::AccessControl;
use super::types::RoleSet;
use crate::core::introspection::format::quote_identifier;
use crate::core::models::{Principal, PrincipalId, PrincipalKind};
use crate::core::resolver::EnabledAccess;
use crate::core::session::Session;
use crate::utils::error::Result;

impl AccessControl {
    /// `CREATE ROLE [IF NOT EXISTS] name`
    pub fn create_role(&self, session: &Session, name: &str, if_not_exists: bool) -> Result<PrincipalId> {
        self.create_principal(session, PrincipalKind::Role, name, if_not_exists)
    }

    /// `DROP ROLE [IF EXISTS] name`
    pub fn drop_role(&self, session: &Session, name: &str, if_exists: bool) -> Result<bool> {
        self.drop_principal(session, PrincipalKind::Role, name, if_exists)
    }

    /// `GRANT role, ... TO grantee, ... [WITH ADMIN OPTION]`
    ///
    /// The acting session needs the admin option on every role named.
    pub fn grant_roles<S: AsRef<str>>(
        &self,
        session: &Session,
        roles: &[S],
        grantees: &[S],
        admin_option: bool,
    ) -> Result<()> {
        let statement = format!(
            "GRANT {} TO {}{}",
            join_names(roles),
            join_names(grantees),
            if admin_option { " WITH ADMIN OPTION" } else { "" }
        );
        let enabled = self.enabled(session)?;

        let (roles, grantees) = self
            .check_role_grant(&enabled, roles, grantees)
            .map_err(|err| self.refused(session, &statement, err))?;

        let role_ids: Vec<PrincipalId> = roles.iter().map(|role| role.id).collect();
        let grantee_ids: Vec<PrincipalId> = grantees.iter().map(|grantee| grantee.id).collect();
        let result = self
            .store
            .grant_roles(&role_ids, &grantee_ids, admin_option)
            .map(|_| ());
        self.audited(session, &statement, result)
    }

    /// `REVOKE [ADMIN OPTION FOR] roles FROM grantee, ...`
    ///
    /// Every role that would be revoked is checked first, in the grantee's granted order
    /// for `ALL` forms; the first one the session cannot administer is reported and
    /// nothing changes.
    pub fn revoke_roles<S: AsRef<str>>(
        &self,
        session: &Session,
        roles: &RoleSet,
        grantees: &[S],
        admin_option_only: bool,
    ) -> Result<()> {
        let statement = format!(
            "REVOKE {}{} FROM {}",
            if admin_option_only { "ADMIN OPTION FOR " } else { "" },
            roles.render(),
            join_names(grantees)
        );
        let enabled = self.enabled(session)?;

        let plan = self
            .check_role_revoke(&enabled, roles, grantees)
            .map_err(|err| self.refused(session, &statement, err))?;

        let result = plan.iter().try_for_each(|(grantee, affected)| {
            affected.iter().try_for_each(|role| {
                self.store
                    .revoke_role(role, grantee, admin_option_only)
                    .map(|_| ())
            })
        });
        self.audited(session, &statement, result)
    }

    /// Resolve roles and grantees, requiring the admin option on every role
    fn check_role_grant<S: AsRef<str>>(
        &self,
        enabled: &EnabledAccess,
        roles: &[S],
        grantees: &[S],
    ) -> Result<(Vec<Principal>, Vec<Principal>)> {
        let roles = roles
            .iter()
            .map(|name| self.store.require(PrincipalKind::Role, name.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        for role in &roles {
            self.resolver.check_admin_option(enabled, &role.id)?;
        }
        Ok((roles, self.grantees(grantees)?))
    }

    /// Roles to revoke per grantee, each of which must be administrable
    fn check_role_revoke<S: AsRef<str>>(
        &self,
        enabled: &EnabledAccess,
        roles: &RoleSet,
        grantees: &[S],
    ) -> Result<Vec<(PrincipalId, Vec<PrincipalId>)>> {
        let mut plan = Vec::new();
        for grantee in self.grantees(grantees)? {
            let affected = roles.affected(&self.store, &grantee)?;
            for role in &affected {
                self.resolver.check_admin_option(enabled, role)?;
            }
            plan.push((grantee.id, affected));
        }
        Ok(plan)
    }

    pub(super) fn grantees<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<Principal>> {
        names
            .iter()
            .map(|name| self.store.require_any(name.as_ref()))
            .collect()
    }
}

pub(super) fn join_names<S: AsRef<str>>(names: &[S]) -> String {
    names
        .iter()
        .map(|name| quote_identifier(name.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}
