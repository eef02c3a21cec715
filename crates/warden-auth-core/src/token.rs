//! RS256 access and refresh tokens
//!
//! Access and refresh tokens are signed with separate RSA key pairs, so a
//! token minted as one kind never verifies as the other.

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use warden_types::{Role, UserId};

use crate::{AuthConfig, AuthError};

/// Which key pair a token belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claims carried by both token kinds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: UserId,
    /// User role
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Token ID; RS256 is deterministic, so this keeps tokens minted in the
    /// same second distinct
    pub jti: Uuid,
    /// Issued at (seconds since epoch)
    pub iat: i64,
    /// Expiration (seconds since epoch)
    pub exp: i64,
}

/// Mints and verifies signed tokens
pub trait TokenCodec: Send + Sync {
    /// Sign a token for `subject` valid for `ttl` from now
    fn mint(
        &self,
        kind: TokenKind,
        subject: UserId,
        role: Option<Role>,
        ttl: Duration,
    ) -> Result<String, AuthError>;

    /// Verify signature and expiry; every failure is `TokenInvalid`
    fn verify(&self, kind: TokenKind, token: &str) -> Result<Claims, AuthError>;
}

/// One RSA key pair
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenKeys {
    /// Parse a PEM private/public key pair
    pub fn from_pem(private_pem: &[u8], public_pem: &[u8]) -> Result<Self, AuthError> {
        let encoding = EncodingKey::from_rsa_pem(private_pem)
            .map_err(|e| AuthError::KeyMaterial(format!("invalid private key: {e}")))?;
        let decoding = DecodingKey::from_rsa_pem(public_pem)
            .map_err(|e| AuthError::KeyMaterial(format!("invalid public key: {e}")))?;

        let keys = Self { encoding, decoding };
        keys.probe()?;
        Ok(keys)
    }

    /// Parse a base64-wrapped PEM key pair (the environment form)
    pub fn from_base64_pem(private_b64: &str, public_b64: &str) -> Result<Self, AuthError> {
        let private_pem = STANDARD
            .decode(private_b64.trim())
            .map_err(|e| AuthError::KeyMaterial(format!("private key is not base64: {e}")))?;
        let public_pem = STANDARD
            .decode(public_b64.trim())
            .map_err(|e| AuthError::KeyMaterial(format!("public key is not base64: {e}")))?;

        Self::from_pem(&private_pem, &public_pem)
    }

    /// Sign and verify a throwaway token so a mismatched pair fails at startup
    fn probe(&self) -> Result<(), AuthError> {
        let claims = new_claims(UserId(Uuid::nil()), None, Duration::minutes(1))?;
        let token = encode(&Header::new(Algorithm::RS256), &claims, &self.encoding)
            .map_err(|e| AuthError::KeyMaterial(format!("private key cannot sign: {e}")))?;
        decode::<Claims>(&token, &self.decoding, &validation())
            .map_err(|_| AuthError::KeyMaterial("public key does not match private key".into()))?;
        Ok(())
    }
}

impl std::fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenKeys").finish_non_exhaustive()
    }
}

/// jsonwebtoken-backed codec
#[derive(Clone, Debug)]
pub struct JwtCodec {
    access: TokenKeys,
    refresh: TokenKeys,
}

impl JwtCodec {
    /// Create a codec from parsed key pairs
    pub fn new(access: TokenKeys, refresh: TokenKeys) -> Self {
        Self { access, refresh }
    }

    /// Parse all key material from config
    pub fn from_config(config: &AuthConfig) -> Result<Self, AuthError> {
        let access =
            TokenKeys::from_base64_pem(&config.access_private_key, &config.access_public_key)?;
        let refresh =
            TokenKeys::from_base64_pem(&config.refresh_private_key, &config.refresh_public_key)?;
        Ok(Self::new(access, refresh))
    }

    fn keys(&self, kind: TokenKind) -> &TokenKeys {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        }
    }
}

impl TokenCodec for JwtCodec {
    fn mint(
        &self,
        kind: TokenKind,
        subject: UserId,
        role: Option<Role>,
        ttl: Duration,
    ) -> Result<String, AuthError> {
        let claims = new_claims(subject, role, ttl)?;
        encode(&Header::new(Algorithm::RS256), &claims, &self.keys(kind).encoding).map_err(|e| {
            tracing::error!(kind = %kind, error = %e, "Failed to sign token");
            AuthError::Internal("failed to sign token".to_string())
        })
    }

    fn verify(&self, kind: TokenKind, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.keys(kind).decoding, &validation()).map_err(|e| {
            tracing::debug!(kind = %kind, error = %e, "Token validation failed");
            AuthError::TokenInvalid
        })?;
        Ok(data.claims)
    }
}

fn new_claims(subject: UserId, role: Option<Role>, ttl: Duration) -> Result<Claims, AuthError> {
    let now = Utc::now();
    let exp = now
        .checked_add_signed(ttl)
        .ok_or_else(|| AuthError::Internal("token expiry out of range".to_string()))?;
    Ok(Claims {
        sub: subject,
        role,
        jti: Uuid::new_v4(),
        iat: now.timestamp(),
        exp: exp.timestamp(),
    })
}

/// RSA family only; HMAC and "none" headers are rejected before any key use
fn validation() -> Validation {
    let mut validation = Validation::new(Algorithm::RS256);
    validation.algorithms = vec![Algorithm::RS256, Algorithm::RS384, Algorithm::RS512];
    validation.leeway = 0;
    validation.validate_aud = false;
    validation.set_required_spec_claims(&["exp", "sub"]);
    validation
}
