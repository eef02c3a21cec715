//! Warden DB - Store abstractions
//!
//! Repository traits for the identity store (PostgreSQL via SQLx) and the
//! session store (Redis), plus their production implementations.
//!
//! # Example
//!
//! ```rust,ignore
//! use warden_db::{create_pool, run_migrations, PgUserRepository, RedisSessionStore};
//!
//! let pool = create_pool("postgres://localhost/warden").await?;
//! run_migrations(&pool).await?;
//! let users = PgUserRepository::new(pool);
//! let sessions = RedisSessionStore::connect("localhost:6379", None).await?;
//!
//! let user = users.find_by_email("user@example.com").await?;
//! ```

pub mod cache;
pub mod error;
pub mod models;
pub mod pg;
pub mod pool;
pub mod repo;

pub use cache::RedisSessionStore;
pub use error::{DbError, DbResult};
pub use models::*;
pub use pg::PgUserRepository;
pub use pool::{create_pool, create_pool_with_options, run_migrations, DbPool, PoolOptions};
pub use repo::*;
