//! Lazily evaluated role sets: `ALL`, `ALL EXCEPT ...` or an explicit list

use super::principal::PrincipalId;
use serde::{Deserialize, Serialize};

/// A set of roles evaluated against the granted roles at the moment of use
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "roles", rename_all = "snake_case")]
pub enum RoleSelection {
    Explicit(Vec<PrincipalId>),
    All,
    AllExcept(Vec<PrincipalId>),
}

impl Default for RoleSelection {
    fn default() -> Self {
        RoleSelection::All
    }
}

impl RoleSelection {
    pub fn none() -> Self {
        RoleSelection::Explicit(Vec::new())
    }

    pub fn matches(&self, id: &PrincipalId) -> bool {
        match self {
            RoleSelection::Explicit(ids) => ids.contains(id),
            RoleSelection::All => true,
            RoleSelection::AllExcept(ids) => !ids.contains(id),
        }
    }

    /// Keep the granted ids this selection matches, in granted order
    pub fn filter<'a, I>(&self, granted: I) -> Vec<PrincipalId>
    where
        I: IntoIterator<Item = &'a PrincipalId>,
    {
        granted
            .into_iter()
            .filter(|id| self.matches(id))
            .copied()
            .collect()
    }

    /// Drop a role id mentioned by this selection
    pub fn forget(&mut self, id: &PrincipalId) {
        match self {
            RoleSelection::Explicit(ids) | RoleSelection::AllExcept(ids) => {
                ids.retain(|existing| existing != id)
            }
            RoleSelection::All => {}
        }
    }
}
