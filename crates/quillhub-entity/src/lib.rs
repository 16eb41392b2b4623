//! # quillhub-entity
//!
//! Domain entities shared by every QuillHub crate: users, roles, and
//! sessions. This crate is a leaf; it depends only on serde/sqlx derives
//! and the basic id/time types.

pub mod session;
pub mod user;

pub use session::Session;
pub use user::{NewUser, User, UserRole};
