//! In-memory store implementations for tests and single-node deployments.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::sync::Mutex;
use uuid::Uuid;

use quillhub_core::error::AppError;
use quillhub_core::result::AppResult;
use quillhub_core::traits::{CredentialStore, SessionStore};
use quillhub_entity::session::Session;
use quillhub_entity::user::{NewUser, User};

/// In-memory credential store using a Tokio mutex.
///
/// The single lock makes the email-uniqueness check on create and the
/// version bump atomic, matching what the SQL implementation gets from
/// the unique index and the atomic UPDATE.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    /// Protected user map.
    users: Arc<Mutex<HashMap<Uuid, User>>>,
}

impl MemoryCredentialStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a fully-formed user record, bypassing the create flow.
    /// Test hook for seeding admins and pre-banned accounts.
    pub async fn insert_user(&self, user: User) {
        self.users.lock().await.insert(user.id, user);
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.users.lock().await;
        Ok(users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.lock().await.get(&id).cloned())
    }

    async fn create(&self, new_user: &NewUser) -> AppResult<User> {
        let mut users = self.users.lock().await;

        if users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&new_user.email))
        {
            return Err(AppError::conflict(format!(
                "Email '{}' is already registered",
                new_user.email
            )));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: new_user.name.clone(),
            email: new_user.email.clone(),
            password_hash: new_user.password_hash.clone(),
            role: new_user.role,
            banned: false,
            ban_reason: None,
            session_version: 0,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> AppResult<()> {
        let mut users = self.users.lock().await;
        let user = users
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;
        user.password_hash = password_hash.to_string();
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn increment_session_version(&self, id: Uuid) -> AppResult<i32> {
        let mut users = self.users.lock().await;
        let user = users
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;
        user.session_version += 1;
        user.updated_at = Utc::now();
        Ok(user.session_version)
    }

    async fn set_banned(&self, id: Uuid, banned: bool, reason: Option<&str>) -> AppResult<()> {
        let mut users = self.users.lock().await;
        let user = users
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;
        user.banned = banned;
        user.ban_reason = if banned { reason.map(String::from) } else { None };
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn touch_last_login(&self, id: Uuid) -> AppResult<()> {
        let mut users = self.users.lock().await;
        if let Some(user) = users.get_mut(&id) {
            user.last_login_at = Some(Utc::now());
        }
        Ok(())
    }
}

/// In-memory session store over a DashMap.
///
/// The entry API gives the same create-conflict atomicity the SQL
/// implementation gets from its primary key.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    /// Sessions keyed by opaque id.
    sessions: Arc<DashMap<String, Session>>,
}

impl MemorySessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions currently stored. Test hook.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, session: &Session) -> AppResult<()> {
        match self.sessions.entry(session.id.clone()) {
            Entry::Occupied(_) => Err(AppError::conflict("Session id already exists")),
            Entry::Vacant(entry) => {
                entry.insert(session.clone());
                Ok(())
            }
        }
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Session>> {
        Ok(self.sessions.get(id).map(|s| s.clone()))
    }

    async fn delete_by_id(&self, id: &str) -> AppResult<()> {
        self.sessions.remove(id);
        Ok(())
    }

    async fn delete_all_for_user(&self, user_id: Uuid) -> AppResult<u64> {
        let before = self.sessions.len();
        self.sessions.retain(|_, s| s.user_id != user_id);
        Ok((before - self.sessions.len()) as u64)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let before = self.sessions.len();
        self.sessions.retain(|_, s| !s.is_expired(now));
        Ok((before - self.sessions.len()) as u64)
    }

    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Vec<Session>> {
        Ok(self
            .sessions
            .iter()
            .filter(|s| s.user_id == user_id)
            .map(|s| s.clone())
            .collect())
    }
}
