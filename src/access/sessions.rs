//! Session lifecycle, role activation and privilege checks

use super::system::AccessControl;
use crate::core::introspection::format::format_privilege;
use crate::core::models::{AccessType, GrantScope, PrincipalKind};
use crate::core::resolver::PrivilegeResolver;
use crate::core::session::{Session, SetRole};
use crate::utils::error::Result;
use crate::utils::logging::AuditLogger;
use std::sync::Arc;

impl AccessControl {
    /// A request-scoped session for `user`
    pub fn login(&self, user: &str) -> Result<Session> {
        let principal = self.store.require(PrincipalKind::User, user)?;
        Ok(Session::ephemeral(&principal))
    }

    /// The named session `id`, opened for `user` on first use
    pub fn session(&self, id: &str, user: &str) -> Result<Arc<Session>> {
        let principal = self.store.require(PrincipalKind::User, user)?;
        let session = self.sessions.get_or_create(id, &principal)?;
        AuditLogger::log_session_event(user, id, "attached");
        Ok(session)
    }

    pub fn close_session(&self, id: &str) -> bool {
        self.sessions.remove(id)
    }

    pub fn expire_idle_sessions(&self) -> usize {
        self.sessions.expire_idle()
    }

    /// `SET ROLE ...`
    pub fn set_role(&self, session: &Session, request: SetRole) -> Result<()> {
        let rendered = match &request {
            SetRole::Roles(names) => names.join(", "),
            SetRole::None => "NONE".to_string(),
            SetRole::Default => "DEFAULT".to_string(),
            SetRole::All => "ALL".to_string(),
            SetRole::AllExcept(names) => format!("ALL EXCEPT {}", names.join(", ")),
        };
        self.roles.set_role(session, request)?;
        AuditLogger::log_role_activation(session.user_name(), session.id(), &rendered);
        Ok(())
    }

    pub fn has_privilege(&self, session: &Session, access: AccessType, scope: &GrantScope) -> Result<bool> {
        Ok(self.enabled(session)?.is_granted(access, scope))
    }

    /// Fail with `InsufficientPrivilege` unless the session may use `access` on `scope`
    pub fn check_access(&self, session: &Session, access: AccessType, scope: &GrantScope) -> Result<()> {
        let enabled = self.enabled(session)?;
        PrivilegeResolver::check(&enabled, access, scope).inspect_err(|_| {
            AuditLogger::log_authz_denied(session.user_name(), &format_privilege(access, scope));
        })
    }
}
