//! Application state

use std::ops::Deref;
use std::sync::Arc;

use warden_auth_core::{AuthService, ProfileService};
use warden_db::{DbPool, PgUserRepository, RedisSessionStore};

use crate::config::Config;

/// Auth service with concrete store types
pub type AuthServiceImpl = AuthService<PgUserRepository, RedisSessionStore>;

/// Profile service with concrete store types
pub type ProfileServiceImpl = ProfileService<PgUserRepository, RedisSessionStore>;

/// Shared database pool wrapper for health checks
#[derive(Clone)]
pub struct SharedPool(Arc<DbPool>);

impl Deref for SharedPool {
    type Target = DbPool;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Registration, login, refresh and logout
    pub auth: Arc<AuthServiceImpl>,
    /// Profile read, update and delete
    pub profile: Arc<ProfileServiceImpl>,
    /// Database connection pool (shared reference for health checks)
    pub pool: SharedPool,
    /// Session store (shared reference for health checks)
    pub sessions: RedisSessionStore,
    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state
    pub fn new(
        auth: AuthServiceImpl,
        profile: ProfileServiceImpl,
        pool: DbPool,
        sessions: RedisSessionStore,
        config: Config,
    ) -> Self {
        Self {
            auth: Arc::new(auth),
            profile: Arc::new(profile),
            pool: SharedPool(Arc::new(pool)),
            sessions,
            config: Arc::new(config),
        }
    }

    /// Get request timeout from config
    pub fn request_timeout(&self) -> std::time::Duration {
        self.config.request_timeout
    }
}
