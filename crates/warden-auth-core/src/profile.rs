//! Profile service - read, update and delete a user record
//!
//! Every operation first runs the access-token protocol from
//! [`SessionManager::verify_access`], then re-checks the current password
//! for anything that mutates the record.

use std::sync::Arc;
use warden_db::{DbError, SessionStore, UpdateUser, UserRepository, UserRow};
use warden_types::{normalize_email, User, UserId};

use crate::{
    password::CredentialHasher,
    session::SessionManager,
    token::{JwtCodec, TokenCodec},
    AuthError,
};

/// Profile update request. Unset fields are left alone.
#[derive(Debug, Clone)]
pub struct UpdateProfile {
    pub user_id: UserId,
    /// Current password, required for any change
    pub password: String,
    pub new_email: Option<String>,
    pub new_password: Option<String>,
    pub new_first_name: Option<String>,
    pub new_last_name: Option<String>,
    pub access_token: String,
}

/// Profile service
pub struct ProfileService<U: UserRepository, S: SessionStore, C: TokenCodec = JwtCodec> {
    users: Arc<U>,
    sessions: SessionManager<S, C>,
    hasher: CredentialHasher,
}

impl<U: UserRepository, S: SessionStore, C: TokenCodec> ProfileService<U, S, C> {
    /// Create a new profile service
    pub fn new(users: Arc<U>, sessions: SessionManager<S, C>) -> Self {
        Self {
            users,
            sessions,
            hasher: CredentialHasher::default(),
        }
    }

    /// Replace the password hasher
    pub fn with_hasher(mut self, hasher: CredentialHasher) -> Self {
        self.hasher = hasher;
        self
    }

    /// Fetch a user
    pub async fn get(&self, user_id: UserId, access_token: &str) -> Result<User, AuthError> {
        self.sessions.verify_access(access_token).await?;
        let row = self.find(user_id).await?;
        Ok(row.into())
    }

    /// Apply a profile change.
    ///
    /// Unchanged-value checks run in the order email, first name, last name,
    /// password, and all of them before the store is written.
    pub async fn update(&self, request: UpdateProfile) -> Result<User, AuthError> {
        self.sessions.verify_access(&request.access_token).await?;

        let row = self.find(request.user_id).await?;
        self.check_password(&row, &request.password, "profile.update")?;

        let new_email = request.new_email.as_deref().map(normalize_email);

        if new_email.as_deref() == Some(row.email.as_str()) {
            return Err(AuthError::EmailUnchanged);
        }
        if request.new_first_name.as_deref() == Some(row.first_name.as_str()) {
            return Err(AuthError::FirstNameUnchanged);
        }
        if request.new_last_name.as_deref() == Some(row.last_name.as_str()) {
            return Err(AuthError::LastNameUnchanged);
        }

        let password_hash = match request.new_password.as_deref() {
            Some(new_password) => {
                if self.hasher.verify(new_password, &row.password_hash)? {
                    return Err(AuthError::PasswordUnchanged);
                }
                Some(self.hasher.hash(new_password)?)
            }
            None => None,
        };

        let update = UpdateUser {
            email: new_email,
            password_hash,
            first_name: request.new_first_name,
            last_name: request.new_last_name,
        };

        let updated = self
            .users
            .update(row.id, update)
            .await
            .map_err(|e| match e {
                DbError::NotFound => AuthError::UserNotFound,
                DbError::UniqueViolation(_) => AuthError::UserExists,
                other => other.into(),
            })?;

        tracing::info!(op = "profile.update", user_id = %request.user_id, "Profile updated");

        Ok(updated.into())
    }

    /// Delete an account and its session.
    ///
    /// The identity record goes first. If removing the session then fails the
    /// error is returned, but the leftover session can no longer reach the
    /// deleted record and expires with its TTL.
    pub async fn delete(
        &self,
        user_id: UserId,
        password: &str,
        access_token: &str,
    ) -> Result<(), AuthError> {
        self.sessions.verify_access(access_token).await?;

        let row = self.find(user_id).await?;
        self.check_password(&row, password, "profile.delete")?;

        self.users.delete(row.id).await?;

        if let Err(e) = self.sessions.revoke(user_id).await {
            tracing::error!(
                op = "profile.delete",
                user_id = %user_id,
                error = %e,
                "User deleted but session removal failed"
            );
            return Err(e);
        }

        tracing::info!(op = "profile.delete", user_id = %user_id, "User deleted");

        Ok(())
    }

    async fn find(&self, user_id: UserId) -> Result<UserRow, AuthError> {
        self.users
            .find_by_id(user_id.0)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    fn check_password(&self, row: &UserRow, password: &str, op: &str) -> Result<(), AuthError> {
        if self.hasher.verify(password, &row.password_hash)? {
            Ok(())
        } else {
            tracing::debug!(op, user_id = %row.id, "Wrong password");
            Err(AuthError::PasswordWrong)
        }
    }
}

impl<U: UserRepository, S: SessionStore, C: TokenCodec> std::fmt::Debug
    for ProfileService<U, S, C>
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileService")
            .field("sessions", &self.sessions)
            .finish_non_exhaustive()
    }
}
