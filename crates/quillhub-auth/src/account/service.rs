//! Registration, login, logout and password-change flows.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use quillhub_core::config::auth::AuthConfig;
use quillhub_core::error::{AppError, ErrorKind, FieldErrors};
use quillhub_core::result::AppResult;
use quillhub_core::traits::CredentialStore;
use quillhub_entity::session::Session;
use quillhub_entity::user::{NewUser, User, UserRole};

use crate::password::PasswordHasher;
use crate::session::SessionManager;

use super::input::{self, ChangePasswordInput, LoginInput, RegisterInput};

/// Uniform rejection for unknown email and wrong password alike.
pub const INVALID_CREDENTIALS: &str = "Invalid email or password.";

/// Decides whether self-service registration is accepted and which role
/// new accounts receive. Injected into [`AccountService`] so the flow
/// never reads global settings.
#[derive(Debug, Clone, Copy)]
pub struct RegistrationPolicy {
    /// Whether self-service registration is open.
    pub open: bool,
    /// Role assigned to self-registered accounts.
    pub default_role: UserRole,
}

impl RegistrationPolicy {
    /// Open registration handing out the regular user role.
    pub fn open() -> Self {
        Self {
            open: true,
            default_role: UserRole::User,
        }
    }

    /// Registration closed.
    pub fn closed() -> Self {
        Self {
            open: false,
            default_role: UserRole::User,
        }
    }

    /// Derives the policy from configuration.
    pub fn from_config(config: &AuthConfig) -> Self {
        Self {
            open: config.registration_enabled,
            default_role: UserRole::User,
        }
    }
}

/// Account flows for end users.
#[derive(Clone)]
pub struct AccountService {
    /// User records.
    users: Arc<dyn CredentialStore>,
    /// Session lifecycle.
    sessions: SessionManager,
    /// Password hashing.
    hasher: PasswordHasher,
    /// Registration policy.
    policy: RegistrationPolicy,
    /// Hash burned on login for unknown emails so the response time does
    /// not reveal whether the account exists.
    dummy_hash: String,
}

impl std::fmt::Debug for AccountService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountService")
            .field("policy", &self.policy)
            .finish()
    }
}

impl AccountService {
    /// Creates a new account service.
    pub fn new(
        users: Arc<dyn CredentialStore>,
        sessions: SessionManager,
        hasher: PasswordHasher,
        policy: RegistrationPolicy,
    ) -> AppResult<Self> {
        let dummy_hash = hasher.hash("quillhub-timing-pad")?;
        Ok(Self {
            users,
            sessions,
            hasher,
            policy,
            dummy_hash,
        })
    }

    /// Registers a new account and signs it in.
    ///
    /// The duplicate-email check and the insert can race with a concurrent
    /// registration; the store's uniqueness constraint catches the loser
    /// and the conflict is reported as the same field error.
    pub async fn register(&self, input: RegisterInput) -> AppResult<(User, Session)> {
        if !self.policy.open {
            return Err(AppError::service_unavailable(
                "Registration is currently closed.",
            ));
        }

        input::check(&input)?;

        if self.users.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::invalid_input(FieldErrors::single(
                "email",
                "Email already in use.",
            )));
        }

        let password_hash = self.hasher.hash(&input.password)?;
        let new_user = NewUser {
            name: input.name,
            email: input.email.to_lowercase(),
            password_hash,
            role: self.policy.default_role,
        };

        let user = match self.users.create(&new_user).await {
            Ok(user) => user,
            Err(e) if e.is_kind(ErrorKind::Conflict) => {
                return Err(AppError::invalid_input(FieldErrors::single(
                    "email",
                    "Email already in use.",
                )));
            }
            Err(e) => return Err(e),
        };

        info!(user_id = %user.id, "Account registered");
        let session = self.sessions.create_session(user.id).await?;
        Ok((user, session))
    }

    /// Authenticates credentials and issues a session.
    ///
    /// Malformed input, unknown email, and wrong password produce the
    /// identical error, and the paths that skip the stored hash still
    /// perform one argon2 verification so every rejection costs the same.
    pub async fn login(&self, input: LoginInput) -> AppResult<(User, Session)> {
        if !input.is_well_formed() {
            self.hasher.verify(&input.password, &self.dummy_hash);
            return Err(AppError::authentication(INVALID_CREDENTIALS));
        }

        let Some(user) = self.users.find_by_email(&input.email).await? else {
            self.hasher.verify(&input.password, &self.dummy_hash);
            return Err(AppError::authentication(INVALID_CREDENTIALS));
        };

        if !self.hasher.verify(&input.password, &user.password_hash) {
            return Err(AppError::authentication(INVALID_CREDENTIALS));
        }

        if !user.can_login() {
            return Err(AppError::authorization("This account has been suspended."));
        }

        if let Err(e) = self.users.touch_last_login(user.id).await {
            warn!(user_id = %user.id, error = %e, "Failed to record last login");
        }

        info!(user_id = %user.id, "Login succeeded");
        let session = self.sessions.create_session(user.id).await?;
        Ok((user, session))
    }

    /// Destroys the presented session. Idempotent.
    pub async fn logout(&self, session_id: &str) -> AppResult<()> {
        self.sessions.destroy_session(session_id).await
    }

    /// Changes the password of an authenticated user.
    ///
    /// Re-verifies the current password, stores the new hash, invalidates
    /// every existing session via the version counter, and issues one
    /// fresh session so the current device stays signed in.
    pub async fn change_password(
        &self,
        user_id: Uuid,
        input: ChangePasswordInput,
    ) -> AppResult<Session> {
        input::check(&input)?;

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))?;

        if !self.hasher.verify(&input.current_password, &user.password_hash) {
            return Err(AppError::invalid_input(FieldErrors::single(
                "current_password",
                "Current password is incorrect.",
            )));
        }

        let password_hash = self.hasher.hash(&input.new_password)?;
        self.users
            .update_password_hash(user.id, &password_hash)
            .await?;
        self.sessions.invalidate_all_sessions(user.id).await?;

        info!(user_id = %user.id, "Password changed, sessions invalidated");
        self.sessions.create_session(user.id).await
    }
}
