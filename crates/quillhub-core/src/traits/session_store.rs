//! Session store trait: persistence seam for session records.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use quillhub_entity::session::Session;

use crate::result::AppResult;

/// Persistence operations over session records.
///
/// Rows are immutable after creation; the only mutation is deletion, so
/// implementations need no row-level locking.
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /// Persist a new session. Fails with a Conflict error if the id
    /// already exists (the caller regenerates and retries).
    async fn create(&self, session: &Session) -> AppResult<()>;

    /// Find a session by its opaque id.
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Session>>;

    /// Delete a session by id. Idempotent: deleting a missing session is
    /// a no-op, not an error.
    async fn delete_by_id(&self, id: &str) -> AppResult<()>;

    /// Delete every session belonging to a user. Returns the number of
    /// rows removed.
    async fn delete_all_for_user(&self, user_id: Uuid) -> AppResult<u64>;

    /// Delete every session with `expires_at <= now`. Returns the number
    /// of rows removed. Used by the maintenance sweep.
    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64>;

    /// List the sessions currently stored for a user (admin view).
    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Vec<Session>>;
}
