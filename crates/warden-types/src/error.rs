//! Common error types

use thiserror::Error;

/// Error parsing a role string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid role: {0}")]
pub struct ParseRoleError(pub String);
