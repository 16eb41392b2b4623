//! Admin operations on other accounts.
//!
//! Callers are expected to have passed `AuthorizationGate::require_admin`
//! already; these methods enforce nothing themselves.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use quillhub_core::error::AppError;
use quillhub_core::result::AppResult;
use quillhub_core::traits::CredentialStore;
use quillhub_entity::session::Session;
use quillhub_entity::user::User;

use crate::session::SessionManager;

/// Administrative account management.
#[derive(Clone)]
pub struct AdminService {
    /// User records.
    users: Arc<dyn CredentialStore>,
    /// Session lifecycle.
    sessions: SessionManager,
}

impl std::fmt::Debug for AdminService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminService").finish()
    }
}

impl AdminService {
    /// Creates a new admin service.
    pub fn new(users: Arc<dyn CredentialStore>, sessions: SessionManager) -> Self {
        Self { users, sessions }
    }

    /// Bans a user. Their sessions are not deleted eagerly; each one is
    /// rejected and removed the next time it is validated.
    pub async fn ban_user(&self, user_id: Uuid, reason: Option<&str>) -> AppResult<()> {
        self.require_user(user_id).await?;
        self.users.set_banned(user_id, true, reason).await?;
        info!(user_id = %user_id, "User banned");
        Ok(())
    }

    /// Lifts a ban. Sessions that were never validated while the ban was
    /// in effect resume working; validated ones were already deleted and
    /// the user signs in again.
    pub async fn unban_user(&self, user_id: Uuid) -> AppResult<()> {
        self.require_user(user_id).await?;
        self.users.set_banned(user_id, false, None).await?;
        info!(user_id = %user_id, "User unbanned");
        Ok(())
    }

    /// Signs a user out of every device: bumps the session version and
    /// eagerly deletes their session rows. Returns the rows removed.
    pub async fn force_logout(&self, user_id: Uuid) -> AppResult<u64> {
        self.require_user(user_id).await?;
        self.sessions.purge_user_sessions(user_id).await
    }

    /// Lists the stored sessions of a user.
    pub async fn list_user_sessions(&self, user_id: Uuid) -> AppResult<Vec<Session>> {
        self.require_user(user_id).await?;
        self.sessions.list_sessions(user_id).await
    }

    /// Looks up a user, failing with `NotFound` if absent.
    pub async fn find_user(&self, user_id: Uuid) -> AppResult<User> {
        self.require_user(user_id).await
    }

    async fn require_user(&self, user_id: Uuid) -> AppResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))
    }
}
