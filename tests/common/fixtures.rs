//! Engine fixtures
//!
//! Every fixture builds a real engine; nothing is mocked.

use rbac_engine::config::AccessControlConfig;
use rbac_engine::core::models::{AccessType, GrantScope};
use rbac_engine::{AccessControl, AccessError, Session};
use std::path::Path;
use std::time::Duration;

/// Role-cache TTL used by expiration tests
pub const SHORT_TTL: Duration = Duration::from_secs(1);

/// An engine plus an administrator session
pub struct TestEngine {
    pub access: AccessControl,
    pub admin: Session,
}

impl TestEngine {
    /// In-memory engine with the default configuration
    pub fn new() -> Self {
        Self::with_config(AccessControlConfig::default())
    }

    /// In-memory engine whose role cache expires after [`SHORT_TTL`]
    pub fn with_short_ttl() -> Self {
        Self::with_config(AccessControlConfig {
            role_cache_expiration_time_seconds: SHORT_TTL.as_secs(),
            ..AccessControlConfig::default()
        })
    }

    /// Engine persisted in `directory`
    pub fn persisted(directory: &Path) -> Self {
        Self::with_config(AccessControlConfig {
            storage_path: Some(directory.to_path_buf()),
            ..AccessControlConfig::default()
        })
    }

    pub fn with_config(config: AccessControlConfig) -> Self {
        let access = AccessControl::new(&config).unwrap();
        let admin = access.admin_session().unwrap();
        Self { access, admin }
    }

    pub fn create_users(&self, names: &[&str]) {
        for name in names {
            self.access.create_user(&self.admin, name, false).unwrap();
        }
    }

    pub fn create_roles(&self, names: &[&str]) {
        for name in names {
            self.access.create_role(&self.admin, name, false).unwrap();
        }
    }

    pub fn grant(&self, access: AccessType, scope: &GrantScope, grantees: &[&str]) {
        self.access
            .grant_privileges(&self.admin, &[access], scope, grantees, false)
            .unwrap();
    }

    pub fn grant_roles(&self, roles: &[&str], grantees: &[&str], admin_option: bool) {
        self.access
            .grant_roles(&self.admin, roles, grantees, admin_option)
            .unwrap();
    }

    /// A fresh session of `user`, as a new connection would get
    pub fn login(&self, user: &str) -> Session {
        self.access.login(user).unwrap()
    }

    /// `SELECT` on `test.table`, optionally restricted to columns
    pub fn select(&self, user: &str, columns: &[&str]) -> Result<(), AccessError> {
        let session = self.login(user);
        let scope = if columns.is_empty() {
            test_table()
        } else {
            GrantScope::columns("test", "table", columns.iter().copied())
        };
        self.access.check_access(&session, AccessType::Select, &scope)
    }

    pub fn show_grants_for(&self, name: &str) -> Vec<String> {
        self.access.show_grants(&self.admin, Some(name)).unwrap()
    }
}

impl Default for TestEngine {
    fn default() -> Self {
        Self::new()
    }
}

pub fn test_table() -> GrantScope {
    GrantScope::table("test", "table")
}

/// Assert a refusal and that its message mentions `fragment`
pub fn assert_not_enough_privileges<T: std::fmt::Debug>(result: Result<T, AccessError>, fragment: &str) {
    let err = result.unwrap_err();
    let message = err.to_string();
    assert!(
        message.contains("Not enough privileges"),
        "unexpected error: {}",
        message
    );
    assert!(message.contains(fragment), "{} does not mention {}", message, fragment);
}
