//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::UserRole;

/// A registered user on the platform.
///
/// The auth core reads `role`, `banned`, and `session_version`; everything
/// else belongs to the account profile. `session_version` is a monotonic
/// counter; bumping it invalidates every session issued before the bump.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Email address (unique, case-insensitive).
    pub email: String,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// User role.
    pub role: UserRole,
    /// Whether the account is banned. A banned user's sessions are
    /// rejected at validation time.
    pub banned: bool,
    /// Reason recorded when the ban was applied.
    pub ban_reason: Option<String>,
    /// Session-version counter; sessions carry a snapshot of this value.
    pub session_version: i32,
    /// When the user registered.
    pub created_at: DateTime<Utc>,
    /// When the user record was last updated.
    pub updated_at: DateTime<Utc>,
    /// Last successful login time.
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// Check if this user has admin privileges.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Check if the user can authenticate right now.
    pub fn can_login(&self) -> bool {
        !self.banned
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Assigned role.
    pub role: UserRole,
}
