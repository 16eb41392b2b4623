//! Session lifecycle manager.
//!
//! Sessions move through `ABSENT → ISSUED → VALID → invalid` where the
//! invalid states (expired, version-stale, banned, revoked) all collapse
//! to "no session" for callers. The distinction is logged internally and
//! never surfaced, so a caller cannot probe which condition tripped.

use std::sync::Arc;

use argon2::password_hash::rand_core::{OsRng, RngCore};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{Duration, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use quillhub_core::config::session::SessionConfig;
use quillhub_core::error::{AppError, ErrorKind};
use quillhub_core::result::AppResult;
use quillhub_core::traits::{CredentialStore, SessionStore};
use quillhub_entity::session::Session;

use super::context::SessionContext;

/// Number of random bytes in a session id (256 bits of entropy).
const SESSION_ID_BYTES: usize = 32;

/// Attempts before giving up on id generation. A collision is already
/// vanishingly unlikely at 256 bits; repeated collisions mean something
/// is wrong with the entropy source.
const MAX_ID_ATTEMPTS: u32 = 3;

/// Manages the complete session lifecycle.
///
/// Holds no mutable state of its own; everything lives in the stores, so
/// concurrent requests need no coordination here.
#[derive(Clone)]
pub struct SessionManager {
    /// Session persistence.
    sessions: Arc<dyn SessionStore>,
    /// User records (role, ban state, session version).
    users: Arc<dyn CredentialStore>,
    /// Session configuration.
    config: SessionConfig,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("config", &self.config)
            .finish()
    }
}

impl SessionManager {
    /// Creates a new session manager.
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        users: Arc<dyn CredentialStore>,
        config: SessionConfig,
    ) -> Self {
        Self {
            sessions,
            users,
            config,
        }
    }

    /// Issues a new session for the given user.
    ///
    /// Snapshots the user's current `session_version`, generates an
    /// unguessable id, and persists the record. Existing sessions for the
    /// same user are untouched: multi-device sessions are independent.
    ///
    /// Fails with `NotFound` if the user vanished mid-flow (the caller
    /// should send the client back to re-authenticate).
    pub async fn create_session(&self, user_id: Uuid) -> AppResult<Session> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))?;

        let now = Utc::now();
        let expires_at = now + Duration::days(self.config.ttl_days as i64);

        for attempt in 0..MAX_ID_ATTEMPTS {
            let session = Session {
                id: generate_session_id(),
                user_id: user.id,
                session_version: user.session_version,
                created_at: now,
                expires_at,
            };

            match self.sessions.create(&session).await {
                Ok(()) => {
                    info!(
                        user_id = %user.id,
                        expires_at = %session.expires_at,
                        "Session created"
                    );
                    return Ok(session);
                }
                Err(e) if e.is_kind(ErrorKind::Conflict) => {
                    warn!(attempt, "Session id collision, regenerating");
                    continue;
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::internal(
            "Failed to generate a unique session id",
        ))
    }

    /// Validates a bearer session id.
    ///
    /// Returns `Ok(None)` for every not-authenticated outcome: unknown
    /// id, expired, version-stale, banned user, or vanished user. The
    /// stale rows are deleted as a side effect (lazy deletion). Absence
    /// of a session is a normal outcome, never an error; only store
    /// failures propagate as `Err`.
    pub async fn validate_session(&self, session_id: &str) -> AppResult<Option<SessionContext>> {
        if session_id.is_empty() {
            return Ok(None);
        }

        let Some(session) = self.sessions.find_by_id(session_id).await? else {
            return Ok(None);
        };

        if session.is_expired(Utc::now()) {
            debug!(user_id = %session.user_id, "Session expired, removing");
            self.sessions.delete_by_id(&session.id).await?;
            return Ok(None);
        }

        let Some(user) = self.users.find_by_id(session.user_id).await? else {
            debug!(user_id = %session.user_id, "Session user no longer exists, removing");
            self.sessions.delete_by_id(&session.id).await?;
            return Ok(None);
        };

        if !user.can_login() {
            debug!(user_id = %user.id, "Session rejected: user is banned");
            self.sessions.delete_by_id(&session.id).await?;
            return Ok(None);
        }

        if !session.matches_version(user.session_version) {
            debug!(
                user_id = %user.id,
                snapshot = session.session_version,
                current = user.session_version,
                "Session rejected: version stale"
            );
            self.sessions.delete_by_id(&session.id).await?;
            return Ok(None);
        }

        Ok(Some(SessionContext {
            user_id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            session_id: session.id,
        }))
    }

    /// Destroys a session (logout). Idempotent: destroying a session that
    /// is already gone succeeds.
    pub async fn destroy_session(&self, session_id: &str) -> AppResult<()> {
        self.sessions.delete_by_id(session_id).await?;
        debug!("Session destroyed");
        Ok(())
    }

    /// Invalidates every session of a user by bumping the session-version
    /// counter. Existing rows are not touched; they fail the version
    /// check on their next validation and are removed then.
    ///
    /// Called on password change, forced logout, and similar events.
    pub async fn invalidate_all_sessions(&self, user_id: Uuid) -> AppResult<i32> {
        let version = self.users.increment_session_version(user_id).await?;
        info!(user_id = %user_id, version, "All sessions invalidated");
        Ok(version)
    }

    /// Forced logout: bumps the version counter *and* eagerly deletes the
    /// user's session rows. Returns the number of rows removed.
    pub async fn purge_user_sessions(&self, user_id: Uuid) -> AppResult<u64> {
        self.users.increment_session_version(user_id).await?;
        let removed = self.sessions.delete_all_for_user(user_id).await?;
        info!(user_id = %user_id, removed, "User sessions purged");
        Ok(removed)
    }

    /// Lists the stored sessions of a user. Expired rows that have not
    /// been lazily removed yet are included.
    pub async fn list_sessions(&self, user_id: Uuid) -> AppResult<Vec<Session>> {
        self.sessions.find_by_user(user_id).await
    }
}

/// Generates an opaque session id from the OS CSPRNG.
///
/// 32 random bytes, base64url-encoded. The id is the sole bearer secret
/// and is derived from nothing but fresh entropy.
fn generate_session_id() -> String {
    let mut bytes = [0u8; SESSION_ID_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn session_ids_are_unique_and_opaque() {
        let mut seen = HashSet::new();
        for _ in 0..1000 {
            let id = generate_session_id();
            // 32 bytes -> 43 base64url chars, no padding
            assert_eq!(id.len(), 43);
            assert!(seen.insert(id));
        }
    }
}
