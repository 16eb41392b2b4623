//! Session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A server-held session record.
///
/// The `id` is the sole bearer secret: an opaque, CSPRNG-generated value
/// with no decodable structure. Sessions are created on login or
/// registration and destroyed by logout, lazy expiry/staleness detection
/// during validation, or the maintenance sweep. Rows are never mutated
/// after creation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    /// Opaque session identifier (bearer token).
    pub id: String,
    /// The user this session belongs to.
    pub user_id: Uuid,
    /// Snapshot of the user's `session_version` at creation time. The
    /// session is valid only while this matches the user's current value.
    pub session_version: i32,
    /// When the session was created (login time).
    pub created_at: DateTime<Utc>,
    /// When the session expires.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Check whether the session has expired as of `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Check whether the snapshot still matches the user's counter.
    pub fn matches_version(&self, current: i32) -> bool {
        self.session_version == current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session(expires_in: Duration) -> Session {
        let now = Utc::now();
        Session {
            id: "test-session".to_string(),
            user_id: Uuid::new_v4(),
            session_version: 0,
            created_at: now,
            expires_at: now + expires_in,
        }
    }

    #[test]
    fn expiry_boundary() {
        let now = Utc::now();
        assert!(session(Duration::seconds(-1)).is_expired(now));
        assert!(!session(Duration::days(7)).is_expired(now));
    }

    #[test]
    fn version_match() {
        let s = session(Duration::days(7));
        assert!(s.matches_version(0));
        assert!(!s.matches_version(1));
    }
}
