//! Users, roles and the role-grant edges between them

use super::role_selection::RoleSelection;
use crate::core::rights::AccessRights;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Stable identity of a user or role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(pub Uuid);

impl PrincipalId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PrincipalId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrincipalKind {
    User,
    Role,
}

impl PrincipalKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PrincipalKind::User => "user",
            PrincipalKind::Role => "role",
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            PrincipalKind::User => "USER",
            PrincipalKind::Role => "ROLE",
        }
    }
}

impl fmt::Display for PrincipalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One role granted to a principal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantedRole {
    pub role: PrincipalId,
    #[serde(default)]
    pub admin_option: bool,
}

/// Roles granted to a principal, in grant order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GrantedRoles {
    entries: Vec<GrantedRole>,
}

impl GrantedRoles {
    /// Grant a role; granting again can only add the admin option
    pub fn grant(&mut self, role: PrincipalId, admin_option: bool) -> bool {
        match self.entries.iter_mut().find(|entry| entry.role == role) {
            Some(entry) => {
                let changed = admin_option && !entry.admin_option;
                entry.admin_option |= admin_option;
                changed
            }
            None => {
                self.entries.push(GrantedRole { role, admin_option });
                true
            }
        }
    }

    pub fn revoke(&mut self, role: &PrincipalId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| &entry.role != role);
        self.entries.len() != before
    }

    pub fn revoke_admin_option(&mut self, role: &PrincipalId) -> bool {
        match self.entries.iter_mut().find(|entry| &entry.role == role) {
            Some(entry) if entry.admin_option => {
                entry.admin_option = false;
                true
            }
            _ => false,
        }
    }

    pub fn contains(&self, role: &PrincipalId) -> bool {
        self.entries.iter().any(|entry| &entry.role == role)
    }

    pub fn has_admin_option(&self, role: &PrincipalId) -> bool {
        self.entries
            .iter()
            .any(|entry| &entry.role == role && entry.admin_option)
    }

    pub fn ids(&self) -> impl Iterator<Item = &PrincipalId> {
        self.entries.iter().map(|entry| &entry.role)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GrantedRole> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A user or role definition as held by the entity store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    pub id: PrincipalId,
    pub kind: PrincipalKind,
    pub name: String,
    /// Direct privilege grants and partial revokes
    #[serde(default)]
    pub access: Arc<AccessRights>,
    #[serde(default)]
    pub granted_roles: GrantedRoles,
    /// Roles a new session starts with; only meaningful for users
    #[serde(default)]
    pub default_roles: RoleSelection,
}

impl Principal {
    pub fn new(kind: PrincipalKind, name: impl Into<String>) -> Self {
        Self {
            id: PrincipalId::new(),
            kind,
            name: name.into(),
            access: Arc::new(AccessRights::default()),
            granted_roles: GrantedRoles::default(),
            default_roles: RoleSelection::All,
        }
    }

    pub fn is_user(&self) -> bool {
        self.kind == PrincipalKind::User
    }

    pub fn is_role(&self) -> bool {
        self.kind == PrincipalKind::Role
    }

    /// Granted roles this principal starts a session with
    pub fn default_role_ids(&self) -> Vec<PrincipalId> {
        self.default_roles.filter(self.granted_roles.ids())
    }

    /// `user \`A\`` style label used in error messages
    pub fn label(&self) -> String {
        format!("{} `{}`", self.kind, self.name)
    }
}
