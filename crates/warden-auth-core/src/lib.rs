//! Warden Auth Core - Authentication business logic
//!
//! Core identity functionality: password hashing, RS256 access/refresh
//! tokens, single-session-per-user refresh sessions, and the auth and
//! profile services built on top of the identity and session stores.

pub mod config;
pub mod crypto;
pub mod error;
pub mod password;
pub mod profile;
pub mod service;
pub mod session;
pub mod token;

pub use config::*;
pub use crypto::*;
pub use error::*;
pub use password::*;
pub use profile::*;
pub use service::*;
pub use session::*;
pub use token::*;
