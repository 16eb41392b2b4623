//! Session lifecycle: creation, validation, destruction, invalidation,
//! and the periodic expired-session sweep.

pub mod context;
pub mod manager;
pub mod sweep;

pub use context::SessionContext;
pub use manager::SessionManager;
pub use sweep::SessionSweeper;
