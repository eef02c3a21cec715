//! Redis session store implementation
//!
//! Each user has at most one key, `refresh_token:{user_id}`, holding the
//! refresh token of the live session. Expiry is delegated to Redis TTLs.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, IntoConnectionInfo};
use std::time::Duration;
use uuid::Uuid;

use crate::error::DbResult;
use crate::repo::{session_key, SessionStore};

/// Redis session store
#[derive(Clone)]
pub struct RedisSessionStore {
    conn: ConnectionManager,
}

impl RedisSessionStore {
    /// Connect to Redis and verify the connection with a PING.
    ///
    /// `address` is `host:port`; the password, when present, is applied
    /// separately so it never needs URL escaping.
    pub async fn connect(address: &str, password: Option<&str>) -> DbResult<Self> {
        let mut info = format!("redis://{address}").into_connection_info()?;
        info.redis.password = password.filter(|p| !p.is_empty()).map(String::from);

        let client = redis::Client::open(info)?;
        let conn = ConnectionManager::new(client).await?;

        let store = Self { conn };
        store.ping().await?;
        tracing::info!(address = %address, "Connected to session store");

        Ok(store)
    }

    /// Round-trip a PING (used by readiness checks)
    pub async fn ping(&self) -> DbResult<()> {
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn put(&self, user_id: Uuid, refresh_token: &str, ttl: Duration) -> DbResult<()> {
        let mut conn = self.conn.clone();
        // EX 0 is rejected by Redis
        let seconds = ttl.as_secs().max(1);
        conn.set_ex::<_, _, ()>(session_key(user_id), refresh_token, seconds)
            .await?;
        Ok(())
    }

    async fn get(&self, user_id: Uuid) -> DbResult<Option<String>> {
        let mut conn = self.conn.clone();
        let token: Option<String> = conn.get(session_key(user_id)).await?;
        Ok(token)
    }

    async fn delete(&self, user_id: Uuid) -> DbResult<()> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(session_key(user_id)).await?;
        Ok(())
    }
}

impl std::fmt::Debug for RedisSessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisSessionStore").finish_non_exhaustive()
    }
}
