//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use quillhub_auth::session::SessionContext;
use quillhub_entity::session::Session;
use quillhub_entity::user::User;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// User summary for responses. Never includes the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    /// User ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Email.
    pub email: String,
    /// Role.
    pub role: String,
    /// Whether the account is banned.
    pub banned: bool,
    /// Created at.
    pub created_at: DateTime<Utc>,
    /// Last login.
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role.to_string(),
            banned: user.banned,
            created_at: user.created_at,
            last_login_at: user.last_login_at,
        }
    }
}

/// Slim profile built from a validated session, for `GET /auth/me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    /// User ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Email.
    pub email: String,
    /// Role.
    pub role: String,
}

impl From<&SessionContext> for ProfileResponse {
    fn from(ctx: &SessionContext) -> Self {
        Self {
            id: ctx.user_id,
            name: ctx.name.clone(),
            email: ctx.email.clone(),
            role: ctx.role.to_string(),
        }
    }
}

/// Session summary for admin listings. The id itself is a bearer secret
/// and stays out of responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    /// Created at.
    pub created_at: DateTime<Utc>,
    /// Expires at.
    pub expires_at: DateTime<Utc>,
}

impl From<&Session> for SessionResponse {
    fn from(session: &Session) -> Self {
        Self {
            created_at: session.created_at,
            expires_at: session.expires_at,
        }
    }
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

impl MessageResponse {
    /// Creates a message response.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Count of sessions removed by a forced logout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemovedResponse {
    /// Rows removed.
    pub removed: u64,
}
