//! Validated inputs for the account flows.

use serde::Deserialize;
use validator::{Validate, ValidationErrors};

use quillhub_core::error::{AppError, FieldErrors};

/// Registration input.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterInput {
    /// Display name.
    #[validate(length(min = 2, max = 64, message = "Name must be 2-64 characters."))]
    pub name: String,
    /// Email address, unique per account (case-insensitive).
    #[validate(email(message = "Email is not a valid address."))]
    pub email: String,
    /// Plaintext password, hashed before anything is stored.
    #[validate(length(min = 6, max = 128, message = "Password must be 6-128 characters."))]
    pub password: String,
    /// Confirmation copy of the password.
    #[validate(must_match(other = "password", message = "Passwords do not match."))]
    pub password_confirm: String,
}

/// Login input. Shape problems are rejected with the same uniform error
/// as a wrong password, so a malformed email reveals nothing.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginInput {
    /// Email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

impl LoginInput {
    /// Whether the submission is worth a lookup: an email-shaped address
    /// and a non-empty secret.
    pub fn is_well_formed(&self) -> bool {
        !self.password.is_empty() && !self.email.trim().is_empty() && self.email.contains('@')
    }
}

/// Password-change input for an authenticated user.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangePasswordInput {
    /// Current password, re-verified before the change is applied.
    pub current_password: String,
    /// New plaintext password.
    #[validate(length(min = 6, max = 128, message = "Password must be 6-128 characters."))]
    pub new_password: String,
    /// Confirmation copy of the new password.
    #[validate(must_match(other = "new_password", message = "Passwords do not match."))]
    pub new_password_confirm: String,
}

/// Converts validator output into the application's field-error shape.
pub(crate) fn check<T: Validate>(input: &T) -> Result<(), AppError> {
    input
        .validate()
        .map_err(|errors| AppError::invalid_input(to_field_errors(errors)))
}

fn to_field_errors(errors: ValidationErrors) -> FieldErrors {
    let mut fields = FieldErrors::new();
    for (field, messages) in errors.field_errors() {
        for error in messages {
            let message = error
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("Invalid value for {field}."));
            fields.push(field.to_string(), message);
        }
    }
    fields
}
