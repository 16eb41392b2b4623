//! Account flows: registration, login, logout, password changes, and
//! the admin operations that act on other accounts.

pub mod admin;
pub mod input;
pub mod service;

pub use admin::AdminService;
pub use input::{ChangePasswordInput, LoginInput, RegisterInput};
pub use service::{AccountService, RegistrationPolicy};
