//! Fixed RSA key pairs for tests (DO NOT use in production!)
//!
//! Generated with: openssl genpkey -algorithm RSA -pkeyopt rsa_keygen_bits:2048

#![allow(dead_code)]

use base64::{engine::general_purpose::STANDARD, Engine};
use warden_auth_core::{AuthConfig, JwtCodec, TokenKeys};

pub const ACCESS_PRIVATE_PEM: &str = include_str!("../fixtures/access.pem");
pub const ACCESS_PUBLIC_PEM: &str = include_str!("../fixtures/access.pub.pem");
pub const REFRESH_PRIVATE_PEM: &str = include_str!("../fixtures/refresh.pem");
pub const REFRESH_PUBLIC_PEM: &str = include_str!("../fixtures/refresh.pub.pem");
pub const FOREIGN_PRIVATE_PEM: &str = include_str!("../fixtures/foreign.pem");
pub const FOREIGN_PUBLIC_PEM: &str = include_str!("../fixtures/foreign.pub.pem");

/// Config holding the test keys in their base64-wrapped environment form
pub fn test_config() -> AuthConfig {
    AuthConfig::new(
        STANDARD.encode(ACCESS_PRIVATE_PEM),
        STANDARD.encode(ACCESS_PUBLIC_PEM),
        STANDARD.encode(REFRESH_PRIVATE_PEM),
        STANDARD.encode(REFRESH_PUBLIC_PEM),
    )
}

pub fn test_codec() -> JwtCodec {
    JwtCodec::from_config(&test_config()).expect("test keys are valid")
}

/// A codec whose keys the services do not trust
pub fn foreign_keys() -> JwtCodec {
    let keys = TokenKeys::from_pem(FOREIGN_PRIVATE_PEM.as_bytes(), FOREIGN_PUBLIC_PEM.as_bytes())
        .expect("foreign keys are valid");
    JwtCodec::new(keys.clone(), keys)
}
