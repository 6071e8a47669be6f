//! Privilege grant and revoke statements

use super::roles::join_names;
use super::system::AccessControl;
use crate::core::introspection::format::format_privileges;
use crate::core::models::{AccessType, GrantScope, Principal};
use crate::core::resolver::{EnabledAccess, PrivilegeResolver};
use crate::core::session::Session;
use crate::utils::error::Result;

impl AccessControl {
    /// `GRANT privileges ON scope TO grantee, ... [WITH GRANT OPTION]`
    ///
    /// The acting session must hold every privilege with grant option.
    pub fn grant_privileges<S: AsRef<str>>(
        &self,
        session: &Session,
        privileges: &[AccessType],
        scope: &GrantScope,
        grantees: &[S],
        grant_option: bool,
    ) -> Result<()> {
        let statement = format!(
            "GRANT {} TO {}{}",
            format_privileges(privileges, scope),
            join_names(grantees),
            if grant_option { " WITH GRANT OPTION" } else { "" }
        );
        let enabled = self.enabled(session)?;
        let grantees = self
            .check_privilege_change(&enabled, privileges, scope, grantees, true)
            .map_err(|err| self.refused(session, &statement, err))?;

        let result = grantees.iter().try_for_each(|grantee| {
            privileges.iter().try_for_each(|access| {
                self.store
                    .grant_privilege(&grantee.id, *access, scope, grant_option)
                    .map(|_| ())
            })
        });
        self.audited(session, &statement, result)
    }

    /// `REVOKE privileges ON scope FROM grantee, ...`
    ///
    /// Revoking part of a broader grant leaves a partial revoke behind.
    pub fn revoke_privileges<S: AsRef<str>>(
        &self,
        session: &Session,
        privileges: &[AccessType],
        scope: &GrantScope,
        grantees: &[S],
    ) -> Result<()> {
        let statement = format!(
            "REVOKE {} FROM {}",
            format_privileges(privileges, scope),
            join_names(grantees)
        );
        let enabled = self.enabled(session)?;
        let grantees = self
            .check_privilege_change(&enabled, privileges, scope, grantees, false)
            .map_err(|err| self.refused(session, &statement, err))?;

        let result = grantees.iter().try_for_each(|grantee| {
            privileges.iter().try_for_each(|access| {
                self.store
                    .revoke_privilege(&grantee.id, *access, scope)
                    .map(|_| ())
            })
        });
        self.audited(session, &statement, result)
    }

    fn check_privilege_change<S: AsRef<str>>(
        &self,
        enabled: &EnabledAccess,
        privileges: &[AccessType],
        scope: &GrantScope,
        grantees: &[S],
        granting: bool,
    ) -> Result<Vec<Principal>> {
        for access in privileges {
            if granting {
                access.check_level(scope.level())?;
            }
            PrivilegeResolver::check_grant_option(enabled, *access, scope)?;
        }
        self.grantees(grantees)
    }
}
