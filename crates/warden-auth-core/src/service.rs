//! Auth service - registration, login, token refresh and logout

use std::sync::Arc;
use warden_db::{CreateUser, DbError, SessionStore, UserRepository};
use warden_types::{normalize_email, User};

use crate::{
    password::CredentialHasher,
    session::{SessionManager, TokenPair},
    token::{JwtCodec, TokenCodec},
    AuthError,
};

/// Registration input
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// A user together with the session just issued for them
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    pub user: User,
    pub tokens: TokenPair,
}

/// Authentication service
///
/// Owns credential checks and the session lifecycle:
/// - Registration and login issue a fresh token pair, replacing any live session
/// - Refresh mints a new access token and leaves the session untouched
/// - Logout removes the session
pub struct AuthService<U: UserRepository, S: SessionStore, C: TokenCodec = JwtCodec> {
    users: Arc<U>,
    sessions: SessionManager<S, C>,
    hasher: CredentialHasher,
}

impl<U: UserRepository, S: SessionStore, C: TokenCodec> AuthService<U, S, C> {
    /// Create a new auth service
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

    /// The session manager, shared with the profile service
    pub fn sessions(&self) -> &SessionManager<S, C> {
        &self.sessions
    }

    /// Create an account and sign it in
    pub async fn register(&self, registration: Registration) -> Result<AuthOutcome, AuthError> {
        let email = normalize_email(&registration.email);

        if self.users.find_by_email(&email).await?.is_some() {
            tracing::debug!(op = "auth.register", "Email already registered");
            return Err(AuthError::UserExists);
        }

        let password_hash = self.hasher.hash(&registration.password)?;

        // The unique index decides races between concurrent registrations
        let row = self
            .users
            .create(CreateUser {
                email,
                password_hash,
                first_name: registration.first_name,
                last_name: registration.last_name,
            })
            .await
            .map_err(|e| match e {
                DbError::UniqueViolation(_) => AuthError::UserExists,
                other => other.into(),
            })?;

        let user = row.to_user();
        let tokens = self.sessions.issue(user.id, Some(user.role)).await?;

        tracing::info!(op = "auth.register", user_id = %user.id, "User registered");

        Ok(AuthOutcome { user, tokens })
    }

    /// Check credentials and start a new session, superseding any previous one
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthOutcome, AuthError> {
        let email = normalize_email(email);

        let row = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !self.hasher.verify(password, &row.password_hash)? {
            tracing::debug!(op = "auth.login", user_id = %row.id, "Wrong password");
            return Err(AuthError::PasswordWrong);
        }

        let user = row.to_user();
        let tokens = self.sessions.issue(user.id, Some(user.role)).await?;

        tracing::info!(op = "auth.login", user_id = %user.id, "User logged in");

        Ok(AuthOutcome { user, tokens })
    }

    /// Mint a new access token for the live session of `refresh_token`
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<String, AuthError> {
        let claims = self.sessions.check_refresh(refresh_token).await?;

        let row = self
            .users
            .find_by_id(claims.sub.0)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let access_token = self.sessions.mint_access(row.user_id(), Some(row.role()))?;

        tracing::debug!(op = "auth.refresh", user_id = %claims.sub, "Access token refreshed");

        Ok(access_token)
    }

    /// End the session the access token belongs to
    pub async fn logout(&self, access_token: &str) -> Result<(), AuthError> {
        let claims = self.sessions.verify_access(access_token).await?;
        self.sessions.revoke(claims.sub).await?;

        tracing::info!(op = "auth.logout", user_id = %claims.sub, "User logged out");

        Ok(())
    }
}

impl<U: UserRepository, S: SessionStore, C: TokenCodec> std::fmt::Debug for AuthService<U, S, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("sessions", &self.sessions)
            .finish_non_exhaustive()
    }
}
