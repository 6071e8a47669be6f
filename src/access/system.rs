//! Access-control system construction and shared helpers

use crate::config::{AccessControlConfig, Config};
use crate::core::models::{AccessType, GrantScope, PrincipalId};
use crate::core::resolver::{EnabledAccess, PrivilegeResolver};
use crate::core::role_cache::RoleCache;
use crate::core::session::{Session, SessionRegistry, SessionRoleManager};
use crate::core::store::EntityStore;
use crate::utils::error::{AccessError, Result};
use crate::utils::logging::AuditLogger;
use std::sync::Arc;
use tracing::{debug, info};

/// Entry point for every access-control statement
pub struct AccessControl {
    pub(super) config: AccessControlConfig,
    pub(super) store: Arc<EntityStore>,
    pub(super) cache: Arc<RoleCache>,
    pub(super) resolver: Arc<PrivilegeResolver>,
    pub(super) roles: SessionRoleManager,
    pub(super) sessions: SessionRegistry,
    /// The bootstrap administrator
    pub(super) admin: PrincipalId,
}

impl AccessControl {
    /// Open the entity store, wire the role cache to it and bootstrap the administrator
    pub fn new(config: &AccessControlConfig) -> Result<Self> {
        info!("Initializing access control");

        let store = Arc::new(match &config.storage_path {
            Some(path) => EntityStore::open(path)?,
            None => EntityStore::in_memory(),
        });
        let cache = Arc::new(RoleCache::new(config.role_cache_ttl()));
        store.subscribe(cache.clone());

        let resolver = Arc::new(PrivilegeResolver::new(store.clone(), cache.clone()));
        let admin = store.create_user(&config.default_user, true)?;
        store.grant_privilege(&admin, AccessType::All, &GrantScope::Global, true)?;

        info!(
            "Access control initialized with {} entities in {} storage",
            store.len(),
            store.storage_name()
        );
        Ok(Self {
            config: config.clone(),
            roles: SessionRoleManager::new(resolver.clone()),
            sessions: SessionRegistry::new(config.session_timeout()),
            store,
            cache,
            resolver,
            admin,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.access_control())
    }

    pub fn config(&self) -> &AccessControlConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<EntityStore> {
        &self.store
    }

    pub fn cache(&self) -> &Arc<RoleCache> {
        &self.cache
    }

    pub fn resolver(&self) -> &Arc<PrivilegeResolver> {
        &self.resolver
    }

    pub fn role_manager(&self) -> &SessionRoleManager {
        &self.roles
    }

    pub fn admin_id(&self) -> &PrincipalId {
        &self.admin
    }

    /// A request-scoped session of the bootstrap administrator
    pub fn admin_session(&self) -> Result<Session> {
        let admin = self.store.get(&self.admin).ok_or_else(|| {
            AccessError::unknown_principal(format!("user `{}`", self.config.default_user))
        })?;
        Ok(Session::ephemeral(&admin))
    }

    pub(super) fn enabled(&self, session: &Session) -> Result<EnabledAccess> {
        session.touch();
        self.roles.enabled_access(session)
    }

    /// Check a privilege for `statement`, auditing a refusal
    pub(super) fn require_privilege(
        &self,
        session: &Session,
        enabled: &EnabledAccess,
        access: AccessType,
        scope: &GrantScope,
        statement: &str,
    ) -> Result<()> {
        PrivilegeResolver::check(enabled, access, scope)
            .map_err(|err| self.refused(session, statement, err))
    }

    /// Audit a refused statement and hand the error back
    pub(super) fn refused(&self, session: &Session, statement: &str, err: AccessError) -> AccessError {
        AuditLogger::log_statement(session.user_name(), statement, Err(&err.to_string()));
        err
    }

    /// Audit the outcome of a statement
    pub(super) fn audited<T>(&self, session: &Session, statement: &str, result: Result<T>) -> Result<T> {
        match &result {
            Ok(_) => AuditLogger::log_statement(session.user_name(), statement, Ok(())),
            Err(err) => {
                AuditLogger::log_statement(session.user_name(), statement, Err(&err.to_string()))
            }
        }
        debug!("{} by {}: {}", statement, session.user_name(), result.is_ok());
        result
    }
}
