//! Validated-session context handed to callers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use quillhub_entity::user::UserRole;

/// The result of a successful session validation.
///
/// An explicit structure rather than an ad-hoc bag of user fields: it
/// carries exactly what downstream callers need, and a value of this type
/// always refers to a non-banned user whose session passed the expiry and
/// version checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionContext {
    /// The authenticated user's id.
    pub user_id: Uuid,
    /// Display name snapshot.
    pub name: String,
    /// Email snapshot.
    pub email: String,
    /// Role for authorization decisions.
    pub role: UserRole,
    /// The opaque id of the validated session.
    pub session_id: String,
}

impl SessionContext {
    /// Whether this context belongs to an admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
