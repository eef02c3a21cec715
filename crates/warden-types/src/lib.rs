//! Warden Types - Shared domain types
//!
//! This crate contains domain types used across Warden crates:
//! - User identity and roles
//! - The public user profile returned to callers

pub mod error;
pub mod role;
pub mod user;

pub use error::*;
pub use role::*;
pub use user::*;
