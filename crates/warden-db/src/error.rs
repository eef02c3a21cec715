//! Store errors

use thiserror::Error;

/// Store errors
#[derive(Error, Debug)]
pub enum DbError {
    /// SQLx error
    #[error("database error: {0}")]
    Sqlx(sqlx::Error),

    /// Redis error
    #[error("session store error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Record not found
    #[error("record not found")]
    NotFound,

    /// A unique constraint rejected the write
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::NotFound,
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                Self::UniqueViolation(db_err.constraint().unwrap_or("unknown").to_string())
            }
            _ => Self::Sqlx(err),
        }
    }
}

/// Result type for store operations
pub type DbResult<T> = Result<T, DbError>;
