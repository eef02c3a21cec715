//! Configuration types for auth service

use std::time::Duration;

/// Default access token lifetime (15 minutes)
pub const DEFAULT_ACCESS_TTL: Duration = Duration::from_secs(15 * 60);

/// Default refresh token lifetime (7 days)
pub const DEFAULT_REFRESH_TTL: Duration = Duration::from_secs(10080 * 60);

/// Auth service configuration
///
/// Key material is base64-wrapped PEM, the same form it arrives in from the
/// environment. Parsing happens once in [`crate::JwtCodec::from_config`].
#[derive(Clone)]
pub struct AuthConfig {
    /// Access token signing key (base64 PEM, PKCS#8 or PKCS#1)
    pub access_private_key: String,
    /// Access token verification key (base64 PEM)
    pub access_public_key: String,
    /// Refresh token signing key (base64 PEM)
    pub refresh_private_key: String,
    /// Refresh token verification key (base64 PEM)
    pub refresh_public_key: String,
    /// Access token lifetime
    pub access_ttl: Duration,
    /// Refresh token lifetime, also the session TTL
    pub refresh_ttl: Duration,
}

impl AuthConfig {
    /// Create a new auth config with default lifetimes
    pub fn new(
        access_private_key: impl Into<String>,
        access_public_key: impl Into<String>,
        refresh_private_key: impl Into<String>,
        refresh_public_key: impl Into<String>,
    ) -> Self {
        Self {
            access_private_key: access_private_key.into(),
            access_public_key: access_public_key.into(),
            refresh_private_key: refresh_private_key.into(),
            refresh_public_key: refresh_public_key.into(),
            access_ttl: DEFAULT_ACCESS_TTL,
            refresh_ttl: DEFAULT_REFRESH_TTL,
        }
    }

    /// Set access token lifetime
    pub fn with_access_ttl(mut self, ttl: Duration) -> Self {
        self.access_ttl = ttl;
        self
    }

    /// Set refresh token lifetime
    pub fn with_refresh_ttl(mut self, ttl: Duration) -> Self {
        self.refresh_ttl = ttl;
        self
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}
