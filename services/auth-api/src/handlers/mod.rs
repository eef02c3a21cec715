//! HTTP handlers

mod auth;
mod health;
mod profile;
mod shared;

pub use auth::{login, logout, refresh, register};
pub use health::{health, ready};
pub use profile::{delete_profile, get_profile, update_profile};
