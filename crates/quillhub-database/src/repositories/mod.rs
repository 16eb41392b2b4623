//! Repository implementations of the core store traits.

pub mod session;
pub mod user;

pub use session::SessionRepository;
pub use user::UserRepository;
