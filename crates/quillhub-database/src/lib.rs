//! # quillhub-database
//!
//! PostgreSQL persistence for QuillHub: connection pool management, the
//! migration runner, and repositories implementing the store traits from
//! `quillhub-core`.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
