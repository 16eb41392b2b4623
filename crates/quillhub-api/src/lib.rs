//! # quillhub-api
//!
//! HTTP API layer for QuillHub built on Axum.
//!
//! Session ids travel in an HttpOnly cookie; handlers delegate to the
//! auth services and map `AppError` to HTTP statuses.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
