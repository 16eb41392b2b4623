//! Authorization gate: role checks over a validated session context.

use quillhub_core::error::AppError;
use quillhub_core::result::AppResult;

use crate::session::SessionContext;

/// Derives access decisions from a validated `SessionContext`.
///
/// Guards call `validate_session` first, then one of these checks, and
/// only then the privileged operation, never speculatively.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthorizationGate;

impl AuthorizationGate {
    /// Creates a new gate.
    pub fn new() -> Self {
        Self
    }

    /// Whether a caller holds any valid session.
    pub fn is_authenticated(&self, context: Option<&SessionContext>) -> bool {
        context.is_some()
    }

    /// Whether the context belongs to an admin.
    pub fn is_admin(&self, context: &SessionContext) -> bool {
        context.is_admin()
    }

    /// Requires admin role, failing with an authorization error.
    pub fn require_admin(&self, context: &SessionContext) -> AppResult<()> {
        if self.is_admin(context) {
            Ok(())
        } else {
            Err(AppError::authorization("Administrator access required"))
        }
    }
}
