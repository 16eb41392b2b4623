//! Request DTOs.
//!
//! The account flows take their validated inputs (`RegisterInput`,
//! `LoginInput`, `ChangePasswordInput`) straight from `quillhub-auth`;
//! only admin-specific payloads are defined here.

use serde::Deserialize;

/// Ban request body.
#[derive(Debug, Clone, Deserialize)]
pub struct BanRequest {
    /// Optional reason shown in admin tooling.
    pub reason: Option<String>,
}
