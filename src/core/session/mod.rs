//! Sessions and per-session role activation

mod manager;
mod registry;

pub use manager::{CurrentRoleRow, EnabledRoleRow, SessionRoleManager};
pub use registry::SessionRegistry;

use crate::core::models::{Principal, PrincipalId, RoleSelection};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::time::{Duration, Instant};

/// Role activation requested by `SET ROLE`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetRole {
    /// `SET ROLE R1, R2`
    Roles(Vec<String>),
    /// `SET ROLE NONE`
    None,
    /// `SET ROLE DEFAULT`
    Default,
    /// `SET ROLE ALL`
    All,
    /// `SET ROLE ALL EXCEPT R1`
    AllExcept(Vec<String>),
}

#[derive(Debug)]
struct SessionState {
    activation: RoleSelection,
    last_used: Instant,
}

/// A user's session together with its role activation
#[derive(Debug)]
pub struct Session {
    id: Option<String>,
    user_id: PrincipalId,
    user_name: String,
    created_at: DateTime<Utc>,
    state: RwLock<SessionState>,
}

impl Session {
    /// Open a session activating the user's default roles as of now
    pub fn new(id: Option<String>, user: &Principal) -> Self {
        Self {
            id,
            user_id: user.id,
            user_name: user.name.clone(),
            created_at: Utc::now(),
            state: RwLock::new(SessionState {
                activation: RoleSelection::Explicit(user.default_role_ids()),
                last_used: Instant::now(),
            }),
        }
    }

    /// A session that lives for a single request
    pub fn ephemeral(user: &Principal) -> Self {
        Self::new(None, user)
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn user_id(&self) -> &PrincipalId {
        &self.user_id
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn activation(&self) -> RoleSelection {
        self.state.read().activation.clone()
    }

    pub(crate) fn set_activation(&self, activation: RoleSelection) {
        let mut state = self.state.write();
        state.activation = activation;
        state.last_used = Instant::now();
    }

    pub fn touch(&self) {
        self.state.write().last_used = Instant::now();
    }

    pub fn idle_for(&self) -> Duration {
        self.state.read().last_used.elapsed()
    }
}
