//! Shared application state threaded through every handler.

use std::sync::Arc;

use quillhub_auth::{AccountService, AdminService, AuthorizationGate, SessionManager};
use quillhub_core::config::AppConfig;
use quillhub_database::DatabasePool;

/// Application state available to all handlers via Axum's `State`.
///
/// Holds services only, never raw stores; the store choice (Postgres or
/// in-memory) is made at wiring time and handlers cannot tell the two
/// apart. The database pool appears only as an optional health probe,
/// absent when the stores are in-memory.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Registration, login, logout, password changes.
    pub accounts: AccountService,
    /// Admin account management.
    pub admin: AdminService,
    /// Session validation and destruction.
    pub sessions: SessionManager,
    /// Role checks.
    pub gate: AuthorizationGate,
    /// Connectivity probe for the health endpoint.
    pub db: Option<DatabasePool>,
}

impl AppState {
    /// Creates the application state.
    pub fn new(
        config: Arc<AppConfig>,
        accounts: AccountService,
        admin: AdminService,
        sessions: SessionManager,
        db: Option<DatabasePool>,
    ) -> Self {
        Self {
            config,
            accounts,
            admin,
            sessions,
            gate: AuthorizationGate::new(),
            db,
        }
    }
}
