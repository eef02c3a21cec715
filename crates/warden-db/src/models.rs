//! Database row models
//!
//! These types map directly to database rows using SQLx's FromRow derive.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;
use warden_types::{Role, User, UserId};

/// User row from the database
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    /// Argon2 PHC string
    #[sqlx(rename = "password")]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl UserRow {
    /// Convert to domain UserId
    pub fn user_id(&self) -> UserId {
        UserId(self.id)
    }

    /// Parsed role; unknown values degrade to the least privileged role
    pub fn role(&self) -> Role {
        self.role.parse().unwrap_or_else(|_| {
            tracing::warn!(user_id = %self.id, role = %self.role, "Unknown role in users table");
            Role::User
        })
    }

    /// Public projection without the password hash
    pub fn to_user(&self) -> User {
        self.clone().into()
    }
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        let role = row.role();
        Self {
            id: row.user_id(),
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            role,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
