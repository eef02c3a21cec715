//! Auth errors

use thiserror::Error;
use warden_db::DbError;

/// Authentication and profile errors
#[derive(Error, Debug)]
pub enum AuthError {
    /// No live user matches the email or ID
    #[error("user.not_found")]
    UserNotFound,

    /// Email is already registered
    #[error("user.exists")]
    UserExists,

    /// Password does not match the stored hash
    #[error("password.wrong")]
    PasswordWrong,

    /// Token is malformed, expired, signed by the wrong key, or its session
    /// is gone. Deliberately a single variant.
    #[error("token.invalid")]
    TokenInvalid,

    /// New email equals the current one
    #[error("email.unchanged")]
    EmailUnchanged,

    /// New password equals the current one
    #[error("password.unchanged")]
    PasswordUnchanged,

    /// New first name equals the current one
    #[error("first_name.unchanged")]
    FirstNameUnchanged,

    /// New last name equals the current one
    #[error("last_name.unchanged")]
    LastNameUnchanged,

    /// Signing or verification key could not be parsed (startup only)
    #[error("key material error: {0}")]
    KeyMaterial(String),

    /// Identity store error
    #[error("database error: {0}")]
    Database(String),

    /// Session store error
    #[error("session store error: {0}")]
    SessionStore(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::PasswordWrong | Self::TokenInvalid => 401,
            Self::UserNotFound => 404,
            Self::UserExists => 409,
            Self::EmailUnchanged
            | Self::PasswordUnchanged
            | Self::FirstNameUnchanged
            | Self::LastNameUnchanged => 400,
            Self::KeyMaterial(_)
            | Self::Database(_)
            | Self::SessionStore(_)
            | Self::Internal(_) => 500,
        }
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UserNotFound => "user.not_found",
            Self::UserExists => "user.exists",
            Self::PasswordWrong => "password.wrong",
            Self::TokenInvalid => "token.invalid",
            Self::EmailUnchanged => "email.unchanged",
            Self::PasswordUnchanged => "password.unchanged",
            Self::FirstNameUnchanged => "first_name.unchanged",
            Self::LastNameUnchanged => "last_name.unchanged",
            Self::KeyMaterial(_)
            | Self::Database(_)
            | Self::SessionStore(_)
            | Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// True for errors that carry backend detail and must not reach callers
    pub fn is_internal(&self) -> bool {
        self.status_code() >= 500
    }
}

impl From<DbError> for AuthError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Redis(e) => {
                tracing::error!("Session store error: {}", e);
                Self::SessionStore(e.to_string())
            }
            other => {
                tracing::error!("Database error: {}", other);
                Self::Database(other.to_string())
            }
        }
    }
}
