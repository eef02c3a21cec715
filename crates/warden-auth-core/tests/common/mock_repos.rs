//! Mock stores for testing

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;
use warden_db::{
    CreateUser, DbError, DbResult, SessionStore, UpdateUser, UserRepository, UserRow,
};

/// In-memory identity store for testing
#[derive(Default, Clone)]
pub struct MockUserRepository {
    users: Arc<DashMap<Uuid, UserRow>>,
    by_email: Arc<DashMap<String, Uuid>>,
    create_calls: Arc<AtomicUsize>,
    update_calls: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl MockUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a test user directly
    pub fn insert_user(&self, user: UserRow) {
        self.by_email.insert(user.email.clone(), user.id);
        self.users.insert(user.id, user);
    }

    /// Look up a stored row without going through the trait
    pub fn row(&self, id: Uuid) -> Option<UserRow> {
        self.users.get(&id).map(|r| r.value().clone())
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn create(&self, user: CreateUser) -> DbResult<UserRow> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);

        let id = Uuid::new_v4();
        // Entry API gives the same single-winner guarantee as a unique index
        match self.by_email.entry(user.email.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                return Err(DbError::UniqueViolation("users_email_key".to_string()));
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }

        let now = Utc::now();
        let row = UserRow {
            id,
            email: user.email,
            password_hash: user.password_hash,
            first_name: user.first_name,
            last_name: user.last_name,
            role: "USER".to_string(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        self.users.insert(id, row.clone());
        Ok(row)
    }

    async fn find_by_email(&self, email: &str) -> DbResult<Option<UserRow>> {
        Ok(self
            .by_email
            .get(email)
            .and_then(|id| self.users.get(id.value()).map(|r| r.value().clone())))
    }

    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<UserRow>> {
        Ok(self.users.get(&id).map(|r| r.value().clone()))
    }

    async fn update(&self, id: Uuid, update: UpdateUser) -> DbResult<UserRow> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);

        let current = self.users.get(&id).map(|r| r.value().clone());
        let mut row = current.ok_or(DbError::NotFound)?;

        if let Some(email) = update.email {
            if self.by_email.get(&email).is_some_and(|owner| *owner != id) {
                return Err(DbError::UniqueViolation("users_email_key".to_string()));
            }
            self.by_email.remove(&row.email);
            self.by_email.insert(email.clone(), id);
            row.email = email;
        }
        if let Some(hash) = update.password_hash {
            row.password_hash = hash;
        }
        if let Some(first_name) = update.first_name {
            row.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            row.last_name = last_name;
        }
        row.updated_at = Utc::now();

        self.users.insert(id, row.clone());
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> DbResult<()> {
        if let Some((_, user)) = self.users.remove(&id) {
            self.by_email.remove(&user.email);
        }
        Ok(())
    }
}

/// In-memory session store with TTL expiry and failure injection
#[derive(Default, Clone)]
pub struct MockSessionStore {
    sessions: Arc<DashMap<Uuid, (String, Instant)>>,
    fail_deletes: Arc<AtomicBool>,
    put_calls: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl MockSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `delete` fail like a dropped Redis connection
    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Raw stored token, ignoring expiry
    pub fn stored(&self, user_id: Uuid) -> Option<String> {
        self.sessions.get(&user_id).map(|r| r.value().0.clone())
    }

    pub fn put_calls(&self) -> usize {
        self.put_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionStore for MockSessionStore {
    async fn put(&self, user_id: Uuid, refresh_token: &str, ttl: Duration) -> DbResult<()> {
        self.put_calls.fetch_add(1, Ordering::SeqCst);
        self.sessions
            .insert(user_id, (refresh_token.to_string(), Instant::now() + ttl));
        Ok(())
    }

    async fn get(&self, user_id: Uuid) -> DbResult<Option<String>> {
        let entry = self.sessions.get(&user_id).map(|r| r.value().clone());
        match entry {
            Some((token, expires_at)) if Instant::now() < expires_at => Ok(Some(token)),
            Some(_) => {
                self.sessions.remove(&user_id);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, user_id: Uuid) -> DbResult<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(DbError::Redis(redis::RedisError::from((
                redis::ErrorKind::IoError,
                "connection reset",
            ))));
        }
        self.sessions.remove(&user_id);
        Ok(())
    }
}
