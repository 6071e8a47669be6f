//! Statement argument types

use crate::core::models::{Principal, PrincipalId, PrincipalKind, RoleSelection};
use crate::core::store::EntityStore;
use crate::utils::error::Result;

/// Roles named by `SET DEFAULT ROLE` or `REVOKE ... FROM`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleSet {
    /// Explicit names; empty means `NONE`
    List(Vec<String>),
    All,
    AllExcept(Vec<String>),
}

impl RoleSet {
    pub fn none() -> Self {
        RoleSet::List(Vec::new())
    }

    pub fn list<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RoleSet::List(names.into_iter().map(Into::into).collect())
    }

    /// Resolve names to a selection; every named role must exist
    pub(crate) fn to_selection(&self, store: &EntityStore) -> Result<RoleSelection> {
        Ok(match self {
            RoleSet::List(names) => RoleSelection::Explicit(role_ids(store, names)?),
            RoleSet::All => RoleSelection::All,
            RoleSet::AllExcept(names) => RoleSelection::AllExcept(role_ids(store, names)?),
        })
    }

    /// Roles of `grantee` this set refers to; explicit names need not be granted
    pub(crate) fn affected(&self, store: &EntityStore, grantee: &Principal) -> Result<Vec<PrincipalId>> {
        match self {
            RoleSet::List(names) => role_ids(store, names),
            _ => Ok(self.to_selection(store)?.filter(grantee.granted_roles.ids())),
        }
    }

    /// SQL rendering used in audit records
    pub(crate) fn render(&self) -> String {
        match self {
            RoleSet::List(names) if names.is_empty() => "NONE".to_string(),
            RoleSet::List(names) => names.join(", "),
            RoleSet::All => "ALL".to_string(),
            RoleSet::AllExcept(names) => format!("ALL EXCEPT {}", names.join(", ")),
        }
    }
}

fn role_ids(store: &EntityStore, names: &[String]) -> Result<Vec<PrincipalId>> {
    names
        .iter()
        .map(|name| store.require(PrincipalKind::Role, name).map(|role| role.id))
        .collect()
}
