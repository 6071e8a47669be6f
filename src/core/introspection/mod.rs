//! Read-only views over the entity store: grant statements and system table rows

pub mod format;

use crate::core::models::{Principal, PrincipalId, PrincipalKind, RoleSelection};
use serde::Serialize;

/// Row of `system.roles`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleRow {
    pub name: String,
    pub id: PrincipalId,
    pub storage: String,
}

/// Row of `system.users`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRow {
    pub name: String,
    pub id: PrincipalId,
    pub storage: String,
    pub default_roles_all: bool,
    pub default_roles_list: Vec<String>,
    pub default_roles_except: Vec<String>,
}

/// Row of `system.grants`; exactly one of `user_name` and `role_name` is set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GrantRow {
    pub user_name: Option<String>,
    pub role_name: Option<String>,
    pub access_type: String,
    pub database: Option<String>,
    pub table: Option<String>,
    pub column: Option<String>,
    pub is_partial_revoke: bool,
    pub grant_option: bool,
}

/// Row of `system.role_grants`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleGrantRow {
    pub user_name: Option<String>,
    pub role_name: Option<String>,
    pub granted_role_name: String,
    pub granted_role_is_default: bool,
    pub with_admin_option: bool,
}

pub fn role_row(role: &Principal, storage: &str) -> RoleRow {
    RoleRow {
        name: role.name.clone(),
        id: role.id,
        storage: storage.to_string(),
    }
}

pub fn user_row<F>(user: &Principal, storage: &str, role_name: F) -> UserRow
where
    F: Fn(&PrincipalId) -> Option<String>,
{
    let names = |ids: &[PrincipalId]| -> Vec<String> {
        ids.iter().filter_map(&role_name).collect()
    };
    let (default_roles_all, default_roles_list, default_roles_except) = match &user.default_roles {
        RoleSelection::All => (true, Vec::new(), Vec::new()),
        RoleSelection::Explicit(ids) => (false, names(ids), Vec::new()),
        RoleSelection::AllExcept(ids) => (true, Vec::new(), names(ids)),
    };

    UserRow {
        name: user.name.clone(),
        id: user.id,
        storage: storage.to_string(),
        default_roles_all,
        default_roles_list,
        default_roles_except,
    }
}

/// One row per grant element, in insertion order
pub fn grant_rows(principal: &Principal) -> Vec<GrantRow> {
    let (user_name, role_name) = owner_columns(principal);
    principal
        .access
        .elements()
        .iter()
        .map(|element| GrantRow {
            user_name: user_name.clone(),
            role_name: role_name.clone(),
            access_type: element.access_type.to_string(),
            database: element.resource.database.clone(),
            table: element.resource.table.clone(),
            column: element.resource.column.clone(),
            is_partial_revoke: element.is_partial_revoke,
            grant_option: element.grant_option,
        })
        .collect()
}

/// One row per role granted to `principal`
pub fn role_grant_rows<F>(principal: &Principal, role_name: F) -> Vec<RoleGrantRow>
where
    F: Fn(&PrincipalId) -> Option<String>,
{
    let (user_name, grantee_role_name) = owner_columns(principal);
    let defaults = principal.default_role_ids();
    principal
        .granted_roles
        .iter()
        .filter_map(|granted| {
            Some(RoleGrantRow {
                user_name: user_name.clone(),
                role_name: grantee_role_name.clone(),
                granted_role_name: role_name(&granted.role)?,
                granted_role_is_default: defaults.contains(&granted.role),
                with_admin_option: granted.admin_option,
            })
        })
        .collect()
}

fn owner_columns(principal: &Principal) -> (Option<String>, Option<String>) {
    match principal.kind {
        PrincipalKind::User => (Some(principal.name.clone()), None),
        PrincipalKind::Role => (None, Some(principal.name.clone())),
    }
}
