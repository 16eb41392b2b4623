//! Store traits consumed by the auth core.
//!
//! The credential store and session store are the core's only external
//! collaborators. Concrete implementations live in `quillhub-database`
//! (PostgreSQL) and `quillhub-auth::memory` (DashMap, for tests and
//! single-node deployments).

pub mod credential_store;
pub mod session_store;

pub use credential_store::CredentialStore;
pub use session_store::SessionStore;
