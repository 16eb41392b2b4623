//! # quillhub-auth
//!
//! The QuillHub auth core: argon2 password hashing, server-side session
//! lifecycle (creation, per-request validation, lazy invalidation,
//! destruction), the session-version counter for global invalidation,
//! role-based authorization, and the register/login/logout flows.
//!
//! All persistent state lives behind the `CredentialStore` and
//! `SessionStore` traits from `quillhub-core`; this crate holds no shared
//! mutable state of its own.

pub mod account;
pub mod memory;
pub mod password;
pub mod rbac;
pub mod session;

pub use account::{AccountService, AdminService, RegistrationPolicy};
pub use password::PasswordHasher;
pub use rbac::AuthorizationGate;
pub use session::{SessionContext, SessionManager, SessionSweeper};
