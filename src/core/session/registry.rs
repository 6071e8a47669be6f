//! Named sessions shared across requests

use super::Session;
use crate::core::models::Principal;
use crate::utils::error::{AccessError, Result};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Sessions addressed by a client supplied id, torn down after an idle timeout
pub struct SessionRegistry {
    sessions: DashMap<String, Arc<Session>>,
    timeout: Duration,
}

impl SessionRegistry {
    pub fn new(timeout: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            timeout,
        }
    }

    /// Return the session registered under `id`, opening it for `user` on first use
    ///
    /// An idle session past the timeout is replaced by a fresh one.
    pub fn get_or_create(&self, id: &str, user: &Principal) -> Result<Arc<Session>> {
        match self.sessions.entry(id.to_string()) {
            Entry::Occupied(mut occupied) => {
                let session = occupied.get();
                if session.idle_for() >= self.timeout {
                    debug!("Session {} expired; reopening", id);
                    let session = Arc::new(Session::new(Some(id.to_string()), user));
                    occupied.insert(Arc::clone(&session));
                    return Ok(session);
                }
                if session.user_id() != &user.id {
                    return Err(AccessError::session(format!(
                        "Session {} is locked by another user",
                        id
                    )));
                }
                session.touch();
                Ok(Arc::clone(session))
            }
            Entry::Vacant(vacant) => {
                let session = Arc::new(Session::new(Some(id.to_string()), user));
                vacant.insert(Arc::clone(&session));
                debug!("Opened session {} for {}", id, user.name);
                Ok(session)
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<Arc<Session>> {
        self.sessions
            .get(id)
            .filter(|session| session.idle_for() < self.timeout)
            .map(|session| Arc::clone(session.value()))
    }

    pub fn remove(&self, id: &str) -> bool {
        self.sessions.remove(id).is_some()
    }

    /// Tear down sessions idle for longer than the timeout; returns how many were removed
    pub fn expire_idle(&self) -> usize {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, session| session.idle_for() < self.timeout);
        before.saturating_sub(self.sessions.len())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
