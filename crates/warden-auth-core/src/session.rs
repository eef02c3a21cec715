//! Refresh sessions
//!
//! A user has at most one live session: the refresh token stored under their
//! ID. Issuing a new pair overwrites it, which invalidates every earlier
//! refresh token and, through [`SessionManager::verify_access`], every access
//! token minted alongside them once their own session is gone.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use warden_db::SessionStore;
use warden_types::{Role, UserId};

use crate::config::{DEFAULT_ACCESS_TTL, DEFAULT_REFRESH_TTL};
use crate::crypto::constant_time_str_eq;
use crate::token::{Claims, JwtCodec, TokenCodec, TokenKind};
use crate::{AuthConfig, AuthError};

/// Access and refresh token issued together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Session manager handles token issuing, verification and revocation
pub struct SessionManager<S: SessionStore, C: TokenCodec = JwtCodec> {
    store: Arc<S>,
    codec: Arc<C>,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl<S: SessionStore, C: TokenCodec> Clone for SessionManager<S, C> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            codec: Arc::clone(&self.codec),
            access_ttl: self.access_ttl,
            refresh_ttl: self.refresh_ttl,
        }
    }
}

impl<S: SessionStore> SessionManager<S, JwtCodec> {
    /// Build a manager with a [`JwtCodec`] parsed from config
    pub fn from_config(store: Arc<S>, config: &AuthConfig) -> Result<Self, AuthError> {
        let codec = JwtCodec::from_config(config)?;
        Self::new(store, Arc::new(codec))
            .with_access_ttl(config.access_ttl)?
            .with_refresh_ttl(config.refresh_ttl)
    }
}

impl<S: SessionStore, C: TokenCodec> SessionManager<S, C> {
    /// Create a new session manager with default token lifetimes
    pub fn new(store: Arc<S>, codec: Arc<C>) -> Self {
        Self {
            store,
            codec,
            access_ttl: DEFAULT_ACCESS_TTL,
            refresh_ttl: DEFAULT_REFRESH_TTL,
        }
    }

    /// Set access token lifetime.
    ///
    /// Fails when an expiry that far out cannot be represented in a token.
    pub fn with_access_ttl(mut self, ttl: Duration) -> Result<Self, AuthError> {
        check_ttl(TokenKind::Access, ttl)?;
        self.access_ttl = ttl;
        Ok(self)
    }

    /// Set refresh token (and session) lifetime
    pub fn with_refresh_ttl(mut self, ttl: Duration) -> Result<Self, AuthError> {
        check_ttl(TokenKind::Refresh, ttl)?;
        self.refresh_ttl = ttl;
        Ok(self)
    }

    /// The token codec
    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Mint a new pair and make it the user's only live session
    pub async fn issue(&self, user_id: UserId, role: Option<Role>) -> Result<TokenPair, AuthError> {
        let access_token = self.mint_access(user_id, role)?;
        let refresh_token =
            self.codec
                .mint(TokenKind::Refresh, user_id, role, to_chrono(self.refresh_ttl)?)?;

        self.store
            .put(user_id.0, &refresh_token, self.refresh_ttl)
            .await?;

        tracing::debug!(user_id = %user_id, "Issued session");

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Mint an access token without touching the session
    pub fn mint_access(&self, user_id: UserId, role: Option<Role>) -> Result<String, AuthError> {
        self.codec
            .mint(TokenKind::Access, user_id, role, to_chrono(self.access_ttl)?)
    }

    /// Authenticate a request by its access token.
    ///
    /// The access token must verify, its subject must have a live session,
    /// and the stored refresh token must still verify.
    pub async fn verify_access(&self, access_token: &str) -> Result<Claims, AuthError> {
        let claims = self.codec.verify(TokenKind::Access, access_token)?;

        let stored = self.store.get(claims.sub.0).await?.ok_or_else(|| {
            tracing::debug!(user_id = %claims.sub, "No live session for access token");
            AuthError::TokenInvalid
        })?;

        self.codec.verify(TokenKind::Refresh, &stored)?;

        Ok(claims)
    }

    /// Check a presented refresh token against the user's live session.
    ///
    /// Only the exact stored token is accepted, so a refresh token superseded
    /// by a later login fails even though its signature is still valid.
    pub async fn check_refresh(&self, refresh_token: &str) -> Result<Claims, AuthError> {
        let claims = self.codec.verify(TokenKind::Refresh, refresh_token)?;

        let stored = self.store.get(claims.sub.0).await?.ok_or_else(|| {
            tracing::debug!(user_id = %claims.sub, "No live session for refresh token");
            AuthError::TokenInvalid
        })?;

        if !constant_time_str_eq(&stored, refresh_token) {
            tracing::debug!(user_id = %claims.sub, "Refresh token superseded");
            return Err(AuthError::TokenInvalid);
        }

        Ok(claims)
    }

    /// Remove the user's session
    pub async fn revoke(&self, user_id: UserId) -> Result<(), AuthError> {
        self.store.delete(user_id.0).await?;
        tracing::debug!(user_id = %user_id, "Revoked session");
        Ok(())
    }
}

fn to_chrono(ttl: Duration) -> Result<chrono::Duration, AuthError> {
    chrono::Duration::from_std(ttl)
        .map_err(|_| AuthError::Internal("token lifetime out of range".to_string()))
}

/// Longest lifetime accepted for either token kind
pub const MAX_TOKEN_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

fn check_ttl(kind: TokenKind, ttl: Duration) -> Result<(), AuthError> {
    if ttl > MAX_TOKEN_TTL {
        tracing::error!(kind = %kind, ttl_secs = ttl.as_secs(), "Token lifetime out of range");
        return Err(AuthError::Internal(format!("{kind} token lifetime out of range")));
    }
    to_chrono(ttl).map(|_| ())
}

impl<S: SessionStore, C: TokenCodec> std::fmt::Debug for SessionManager<S, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}
