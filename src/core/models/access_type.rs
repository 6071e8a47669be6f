//! Privilege kinds and the levels they may be granted at

use crate::utils::error::{AccessError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of privilege carried by a grant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AccessType {
    Select,
    Insert,
    Alter,
    Create,
    Drop,
    Truncate,
    CreateUser,
    AlterUser,
    DropUser,
    CreateRole,
    DropRole,
    RoleAdmin,
    ShowUsers,
    ShowRoles,
    /// Group of every user and role management privilege
    AccessManagement,
    /// Group of every privilege
    All,
}

/// Narrowest scope a privilege may be granted at
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum GrantLevel {
    Global,
    Database,
    Table,
    Column,
}

impl AccessType {
    pub const MANAGEMENT: [AccessType; 8] = [
        AccessType::CreateUser,
        AccessType::AlterUser,
        AccessType::DropUser,
        AccessType::CreateRole,
        AccessType::DropRole,
        AccessType::RoleAdmin,
        AccessType::ShowUsers,
        AccessType::ShowRoles,
    ];

    /// Whether holding `self` implies holding `other`
    pub fn implies(self, other: AccessType) -> bool {
        match self {
            AccessType::All => true,
            AccessType::AccessManagement => {
                other == AccessType::AccessManagement || Self::MANAGEMENT.contains(&other)
            }
            _ => self == other,
        }
    }

    /// Whether a grant of one kind and a revoke of the other touch the same privilege
    pub fn overlaps(self, other: AccessType) -> bool {
        self.implies(other) || other.implies(self)
    }

    pub fn is_management(self) -> bool {
        self == AccessType::AccessManagement || Self::MANAGEMENT.contains(&self)
    }

    pub fn max_level(self) -> GrantLevel {
        match self {
            AccessType::Select | AccessType::Insert => GrantLevel::Column,
            AccessType::Alter
            | AccessType::Create
            | AccessType::Drop
            | AccessType::Truncate
            | AccessType::All => GrantLevel::Table,
            _ => GrantLevel::Global,
        }
    }

    /// Reject grants narrower than the privilege supports
    pub fn check_level(self, level: GrantLevel) -> Result<()> {
        if level > self.max_level() {
            return Err(AccessError::validation(format!(
                "The privilege {} cannot be granted at {} level",
                self,
                match level {
                    GrantLevel::Global => "global",
                    GrantLevel::Database => "database",
                    GrantLevel::Table => "table",
                    GrantLevel::Column => "column",
                }
            )));
        }
        Ok(())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AccessType::Select => "SELECT",
            AccessType::Insert => "INSERT",
            AccessType::Alter => "ALTER",
            AccessType::Create => "CREATE",
            AccessType::Drop => "DROP",
            AccessType::Truncate => "TRUNCATE",
            AccessType::CreateUser => "CREATE USER",
            AccessType::AlterUser => "ALTER USER",
            AccessType::DropUser => "DROP USER",
            AccessType::CreateRole => "CREATE ROLE",
            AccessType::DropRole => "DROP ROLE",
            AccessType::RoleAdmin => "ROLE ADMIN",
            AccessType::ShowUsers => "SHOW USERS",
            AccessType::ShowRoles => "SHOW ROLES",
            AccessType::AccessManagement => "ACCESS MANAGEMENT",
            AccessType::All => "ALL",
        }
    }
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessType {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s
            .split(|c: char| c.is_whitespace() || c == '_')
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
            .to_uppercase();

        let access = match normalized.as_str() {
            "SELECT" => AccessType::Select,
            "INSERT" => AccessType::Insert,
            "ALTER" => AccessType::Alter,
            "CREATE" => AccessType::Create,
            "DROP" => AccessType::Drop,
            "TRUNCATE" => AccessType::Truncate,
            "CREATE USER" => AccessType::CreateUser,
            "ALTER USER" => AccessType::AlterUser,
            "DROP USER" => AccessType::DropUser,
            "CREATE ROLE" => AccessType::CreateRole,
            "DROP ROLE" => AccessType::DropRole,
            "ROLE ADMIN" => AccessType::RoleAdmin,
            "SHOW USERS" => AccessType::ShowUsers,
            "SHOW ROLES" => AccessType::ShowRoles,
            "ACCESS MANAGEMENT" => AccessType::AccessManagement,
            "ALL" | "ALL PRIVILEGES" => AccessType::All,
            _ => {
                return Err(AccessError::validation(format!(
                    "Unknown access type: {}",
                    s
                )));
            }
        };
        Ok(access)
    }
}

impl TryFrom<String> for AccessType {
    type Error = AccessError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<AccessType> for String {
    fn from(value: AccessType) -> Self {
        value.as_str().to_string()
    }
}
