//! Common test utilities for warden-auth-core integration tests

pub mod keys;
pub mod mock_repos;

#[allow(unused_imports)]
pub use keys::{foreign_keys, test_codec, test_config};
#[allow(unused_imports)]
pub use mock_repos::{MockSessionStore, MockUserRepository};

use argon2::Params;
use std::sync::Arc;
use std::time::Duration;
use warden_auth_core::{AuthService, CredentialHasher, ProfileService, Registration, SessionManager};

/// Argon2 parameters cheap enough for debug-build tests
#[allow(dead_code)]
pub fn fast_hasher() -> CredentialHasher {
    CredentialHasher::with_params(Params::new(8, 1, 1, None).expect("valid argon2 params"))
}

/// Services wired to in-memory stores
#[allow(dead_code)]
pub struct Harness {
    pub users: Arc<MockUserRepository>,
    pub store: Arc<MockSessionStore>,
    pub sessions: SessionManager<MockSessionStore>,
    pub auth: AuthService<MockUserRepository, MockSessionStore>,
    pub profile: ProfileService<MockUserRepository, MockSessionStore>,
}

#[allow(dead_code)]
pub fn harness() -> Harness {
    harness_with_refresh_ttl(Duration::from_secs(60 * 60))
}

#[allow(dead_code)]
pub fn harness_with_refresh_ttl(refresh_ttl: Duration) -> Harness {
    let users = Arc::new(MockUserRepository::new());
    let store = Arc::new(MockSessionStore::new());
    let sessions = SessionManager::new(Arc::clone(&store), Arc::new(test_codec()))
        .with_access_ttl(Duration::from_secs(15 * 60))
        .and_then(|s| s.with_refresh_ttl(refresh_ttl))
        .expect("test lifetimes are in range");

    let auth = AuthService::new(Arc::clone(&users), sessions.clone()).with_hasher(fast_hasher());
    let profile =
        ProfileService::new(Arc::clone(&users), sessions.clone()).with_hasher(fast_hasher());

    Harness {
        users,
        store,
        sessions,
        auth,
        profile,
    }
}

#[allow(dead_code)]
pub fn registration(email: &str, password: &str, first_name: &str, last_name: &str) -> Registration {
    Registration {
        email: email.to_string(),
        password: password.to_string(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
    }
}

#[allow(dead_code)]
pub fn alice() -> Registration {
    registration("alice@x.com", "pw123", "Alice", "Lee")
}
