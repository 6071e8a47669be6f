//! Structured audit events for access-control statements

use tracing::{debug, info, warn};

/// Target every audit event is emitted on
pub const AUDIT_TARGET: &str = "audit";

/// Records who changed or attempted to change access, and the outcome
pub struct AuditLogger;

impl AuditLogger {
    /// A management statement that was executed or refused
    pub fn log_statement(actor: &str, statement: &str, result: Result<(), &str>) {
        match result {
            Ok(()) => info!(
                target: AUDIT_TARGET,
                actor,
                statement,
                success = true,
                "Access statement executed"
            ),
            Err(reason) => warn!(
                target: AUDIT_TARGET,
                actor,
                statement,
                success = false,
                reason,
                "Access statement refused"
            ),
        }
    }

    /// A privilege check denied to a session
    pub fn log_authz_denied(actor: &str, requirement: &str) {
        warn!(
            target: AUDIT_TARGET,
            actor,
            requirement,
            granted = false,
            "Authorization denied"
        );
    }

    /// Role activation of a session changed
    pub fn log_role_activation(actor: &str, session_id: Option<&str>, activation: &str) {
        info!(
            target: AUDIT_TARGET,
            actor,
            session_id = session_id.unwrap_or("-"),
            activation,
            "Role activation changed"
        );
    }

    pub fn log_session_event(actor: &str, session_id: &str, event: &str) {
        debug!(target: AUDIT_TARGET, actor, session_id, event, "Session event");
    }
}
