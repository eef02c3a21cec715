//! Repository traits
//!
//! Define async interfaces for the identity store and the session store.
//! Services are generic over these so backends can be swapped without
//! touching business logic.

use async_trait::async_trait;
use std::time::Duration;
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::UserRow;

/// Identity store
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user.
    ///
    /// Fails with `DbError::UniqueViolation` when the email is taken, so of two
    /// concurrent creates for one email exactly one succeeds.
    async fn create(&self, user: CreateUser) -> DbResult<UserRow>;

    /// Find a live user by (already normalized) email
    async fn find_by_email(&self, email: &str) -> DbResult<Option<UserRow>>;

    /// Find a live user by ID
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<UserRow>>;

    /// Apply a partial update; unset fields keep their stored value.
    ///
    /// Fails with `DbError::NotFound` when no live row has this ID.
    async fn update(&self, id: Uuid, update: UpdateUser) -> DbResult<UserRow>;

    /// Delete a user
    async fn delete(&self, id: Uuid) -> DbResult<()>;
}

/// Create user input
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
}

/// Partial user update
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Session store: one live refresh token per user
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store the refresh token for a user, replacing any previous one
    async fn put(&self, user_id: Uuid, refresh_token: &str, ttl: Duration) -> DbResult<()>;

    /// Get the live refresh token for a user; `None` once deleted or expired
    async fn get(&self, user_id: Uuid) -> DbResult<Option<String>>;

    /// Remove the session for a user. Removing a missing session is not an error.
    async fn delete(&self, user_id: Uuid) -> DbResult<()>;
}

/// Key under which a user's refresh token is stored
pub fn session_key(user_id: Uuid) -> String {
    format!("refresh_token:{user_id}")
}
