//! Result alias used across all QuillHub crates.

use crate::error::AppError;

/// Application-wide result type.
pub type AppResult<T> = Result<T, AppError>;
