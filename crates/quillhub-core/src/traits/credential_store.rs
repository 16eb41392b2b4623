//! Credential store trait: persistence seam for user records.

use async_trait::async_trait;
use uuid::Uuid;

use quillhub_entity::user::{NewUser, User};

use crate::result::AppResult;

/// Persistence operations over user records consumed by the auth core.
///
/// The core only ever reads `role`/`banned`/`session_version` and bumps
/// the version counter; profile CRUD beyond account creation belongs to
/// the content platform.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Find a user by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Find a user by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Create a new user with `session_version = 0`. Fails with a
    /// Conflict error if the email is already taken.
    async fn create(&self, user: &NewUser) -> AppResult<User>;

    /// Replace the stored password hash.
    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> AppResult<()>;

    /// Atomically increment the user's session-version counter and return
    /// the new value. Must not be a read-modify-write in application code.
    async fn increment_session_version(&self, id: Uuid) -> AppResult<i32>;

    /// Set or clear the ban flag.
    async fn set_banned(&self, id: Uuid, banned: bool, reason: Option<&str>) -> AppResult<()>;

    /// Record a successful login time. Best-effort bookkeeping.
    async fn touch_last_login(&self, id: Uuid) -> AppResult<()>;
}
