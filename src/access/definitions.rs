//! Declarative access definitions loaded from YAML
//!
//! Definitions are applied by the bootstrap administrator with `IF NOT EXISTS`
//! semantics, so applying the same file twice changes nothing.

use super::system::AccessControl;
use super::types::RoleSet;
use crate::core::models::{AccessType, GrantScope};
use crate::utils::error::{AccessError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Users, roles and grants to create on startup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessDefinitions {
    #[serde(default)]
    pub users: Vec<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub grants: Vec<GrantDefinition>,
    #[serde(default)]
    pub role_grants: Vec<RoleGrantDefinition>,
    #[serde(default)]
    pub default_roles: Vec<DefaultRolesDefinition>,
}

/// `GRANT access ON database.table(columns) TO to`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantDefinition {
    pub access: Vec<AccessType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,
    pub to: Vec<String>,
    #[serde(default)]
    pub with_grant_option: bool,
}

impl GrantDefinition {
    pub fn scope(&self) -> Result<GrantScope> {
        GrantScope::from_parts(
            self.database.clone(),
            self.table.clone(),
            self.columns.clone(),
        )
    }
}

/// `GRANT roles TO to`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleGrantDefinition {
    pub roles: Vec<String>,
    pub to: Vec<String>,
    #[serde(default)]
    pub with_admin_option: bool,
}

/// `SET DEFAULT ROLE ... TO user`
///
/// `all: true` selects every granted role except `except`; otherwise `roles` is the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultRolesDefinition {
    pub user: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub all: bool,
    #[serde(default)]
    pub except: Vec<String>,
}

impl DefaultRolesDefinition {
    pub fn role_set(&self) -> Result<RoleSet> {
        match (self.all, self.roles.is_empty(), self.except.is_empty()) {
            (true, true, true) => Ok(RoleSet::All),
            (true, true, false) => Ok(RoleSet::AllExcept(self.except.clone())),
            (false, _, true) => Ok(RoleSet::List(self.roles.clone())),
            _ => Err(AccessError::validation(format!(
                "Default roles of {}: list roles or set all (with except), not both",
                self.user
            ))),
        }
    }
}

/// What applying a definitions file did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefinitionsReport {
    pub users: usize,
    pub roles: usize,
    pub grants: usize,
    pub role_grants: usize,
    pub default_roles: usize,
}

impl AccessDefinitions {
    pub fn from_yaml(content: &str) -> Result<Self> {
        let definitions: Self = serde_yaml::from_str(content)?;
        definitions.validate()?;
        Ok(definitions)
    }

    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading access definitions from: {:?}", path);
        let content = tokio::fs::read_to_string(path).await?;
        Self::from_yaml(&content)
    }

    /// Check shapes that do not need the store
    pub fn validate(&self) -> Result<()> {
        for grant in &self.grants {
            let scope = grant.scope()?;
            for access in &grant.access {
                access.check_level(scope.level())?;
            }
            if grant.to.is_empty() {
                return Err(AccessError::validation("A grant needs at least one grantee"));
            }
        }
        for default in &self.default_roles {
            default.role_set()?;
        }
        Ok(())
    }

    /// Create everything as the bootstrap administrator
    pub fn apply(&self, access: &AccessControl) -> Result<DefinitionsReport> {
        let admin = access.admin_session()?;
        let mut report = DefinitionsReport::default();

        for user in &self.users {
            access.create_user(&admin, user, true)?;
            report.users += 1;
        }
        for role in &self.roles {
            access.create_role(&admin, role, true)?;
            report.roles += 1;
        }
        for grant in &self.grants {
            access.grant_privileges(
                &admin,
                &grant.access,
                &grant.scope()?,
                &grant.to,
                grant.with_grant_option,
            )?;
            report.grants += 1;
        }
        for role_grant in &self.role_grants {
            access.grant_roles(
                &admin,
                &role_grant.roles,
                &role_grant.to,
                role_grant.with_admin_option,
            )?;
            report.role_grants += 1;
        }
        for default in &self.default_roles {
            access.set_default_roles(&admin, &default.user, default.role_set()?)?;
            report.default_roles += 1;
        }

        debug!("Applied access definitions: {:?}", report);
        Ok(report)
    }
}
