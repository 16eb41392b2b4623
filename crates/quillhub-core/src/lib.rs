//! # quillhub-core
//!
//! Core crate for QuillHub. Contains the unified error system,
//! configuration schemas, and the store traits the auth core consumes
//! (credential store and session store).
//!
//! Depends only on `quillhub-entity` internally.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::{AppError, ErrorKind, FieldErrors};
pub use result::AppResult;
