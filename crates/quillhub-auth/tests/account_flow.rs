//! Register, login, logout, password-change and admin flow tests over
//! the in-memory stores.

use std::sync::Arc;

use quillhub_auth::account::service::INVALID_CREDENTIALS;
use quillhub_auth::account::{
    AccountService, AdminService, ChangePasswordInput, LoginInput, RegisterInput,
    RegistrationPolicy,
};
use quillhub_auth::memory::{MemoryCredentialStore, MemorySessionStore};
use quillhub_auth::{PasswordHasher, SessionManager};
use quillhub_core::ErrorKind;
use quillhub_core::config::session::SessionConfig;
use quillhub_core::traits::{CredentialStore, SessionStore};
use quillhub_entity::user::UserRole;

struct Harness {
    users: Arc<MemoryCredentialStore>,
    sessions: Arc<MemorySessionStore>,
    manager: SessionManager,
    accounts: AccountService,
    admin: AdminService,
}

async fn harness_with(policy: RegistrationPolicy) -> Harness {
    let users = Arc::new(MemoryCredentialStore::new());
    let sessions = Arc::new(MemorySessionStore::new());
    let manager = SessionManager::new(
        sessions.clone() as Arc<dyn SessionStore>,
        users.clone() as Arc<dyn CredentialStore>,
        SessionConfig::default(),
    );
    let accounts = AccountService::new(
        users.clone() as Arc<dyn CredentialStore>,
        manager.clone(),
        PasswordHasher::new(),
        policy,
    )
    .unwrap();
    let admin = AdminService::new(users.clone() as Arc<dyn CredentialStore>, manager.clone());
    Harness {
        users,
        sessions,
        manager,
        accounts,
        admin,
    }
}

async fn harness() -> Harness {
    harness_with(RegistrationPolicy::open()).await
}

fn register_input(email: &str) -> RegisterInput {
    RegisterInput {
        name: "Alice".to_string(),
        email: email.to_string(),
        password: "hunter22".to_string(),
        password_confirm: "hunter22".to_string(),
    }
}

fn login_input(email: &str, password: &str) -> LoginInput {
    LoginInput {
        email: email.to_string(),
        password: password.to_string(),
    }
}

#[tokio::test]
async fn register_creates_account_and_signs_in() {
    let h = harness().await;

    let (user, session) = h
        .accounts
        .register(register_input("alice@example.com"))
        .await
        .unwrap();

    assert_eq!(user.role, UserRole::User);
    assert!(!user.banned);
    // The plaintext never lands in storage.
    assert_ne!(user.password_hash, "hunter22");
    assert!(user.password_hash.starts_with("$argon2"));

    let ctx = h
        .manager
        .validate_session(&session.id)
        .await
        .unwrap()
        .expect("registration session should be valid");
    assert_eq!(ctx.user_id, user.id);
}

#[tokio::test]
async fn duplicate_email_is_a_field_error() {
    let h = harness().await;
    h.accounts
        .register(register_input("alice@example.com"))
        .await
        .unwrap();

    let err = h
        .accounts
        .register(register_input("ALICE@example.com"))
        .await
        .unwrap_err();

    assert!(err.is_kind(ErrorKind::Validation));
    let fields = err.fields.unwrap();
    assert_eq!(fields.get("email").unwrap()[0], "Email already in use.");
}

#[tokio::test]
async fn closed_registration_rejects_before_storage() {
    let h = harness_with(RegistrationPolicy::closed()).await;

    let err = h
        .accounts
        .register(register_input("alice@example.com"))
        .await
        .unwrap_err();

    assert!(err.is_kind(ErrorKind::ServiceUnavailable));
    assert!(
        h.users
            .find_by_email("alice@example.com")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn weak_password_never_reaches_the_store() {
    let h = harness().await;
    let mut input = register_input("alice@example.com");
    input.password = "abc".to_string();
    input.password_confirm = "abc".to_string();

    let err = h.accounts.register(input).await.unwrap_err();

    assert!(err.is_kind(ErrorKind::Validation));
    assert!(
        h.users
            .find_by_email("alice@example.com")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn login_rejects_unknown_and_wrong_password_identically() {
    let h = harness().await;
    h.accounts
        .register(register_input("alice@example.com"))
        .await
        .unwrap();

    let unknown = h
        .accounts
        .login(login_input("nobody@example.com", "hunter22"))
        .await
        .unwrap_err();
    let wrong = h
        .accounts
        .login(login_input("alice@example.com", "wrong-password"))
        .await
        .unwrap_err();

    assert!(unknown.is_kind(ErrorKind::Authentication));
    assert!(wrong.is_kind(ErrorKind::Authentication));
    assert_eq!(unknown.message, INVALID_CREDENTIALS);
    assert_eq!(wrong.message, INVALID_CREDENTIALS);
}

#[tokio::test]
async fn malformed_login_input_gets_the_uniform_error() {
    let h = harness().await;
    h.accounts
        .register(register_input("alice@example.com"))
        .await
        .unwrap();

    for (email, password) in [
        ("", "hunter22"),
        ("alice@example.com", ""),
        ("not-an-email", "hunter22"),
    ] {
        let err = h
            .accounts
            .login(login_input(email, password))
            .await
            .unwrap_err();
        assert!(err.is_kind(ErrorKind::Authentication), "{email:?}");
        assert_eq!(err.message, INVALID_CREDENTIALS);
    }
}

#[tokio::test]
async fn login_issues_independent_sessions_per_device() {
    let h = harness().await;
    h.accounts
        .register(register_input("alice@example.com"))
        .await
        .unwrap();

    let (_, phone) = h
        .accounts
        .login(login_input("alice@example.com", "hunter22"))
        .await
        .unwrap();
    let (user, laptop) = h
        .accounts
        .login(login_input("alice@example.com", "hunter22"))
        .await
        .unwrap();

    assert_ne!(phone.id, laptop.id);
    assert!(user.last_login_at.is_some());

    h.accounts.logout(&phone.id).await.unwrap();
    assert!(h.manager.validate_session(&phone.id).await.unwrap().is_none());
    assert!(
        h.manager
            .validate_session(&laptop.id)
            .await
            .unwrap()
            .is_some()
    );
}

#[tokio::test]
async fn banned_user_cannot_log_in() {
    let h = harness().await;
    let (user, _) = h
        .accounts
        .register(register_input("alice@example.com"))
        .await
        .unwrap();
    h.admin.ban_user(user.id, Some("spam")).await.unwrap();

    let err = h
        .accounts
        .login(login_input("alice@example.com", "hunter22"))
        .await
        .unwrap_err();
    assert!(err.is_kind(ErrorKind::Authorization));
}

#[tokio::test]
async fn password_change_rotates_sessions() {
    let h = harness().await;
    let (user, old_session) = h
        .accounts
        .register(register_input("alice@example.com"))
        .await
        .unwrap();

    let fresh = h
        .accounts
        .change_password(
            user.id,
            ChangePasswordInput {
                current_password: "hunter22".to_string(),
                new_password: "correct-horse".to_string(),
                new_password_confirm: "correct-horse".to_string(),
            },
        )
        .await
        .unwrap();

    // Old session is version-stale, the fresh one works.
    assert!(
        h.manager
            .validate_session(&old_session.id)
            .await
            .unwrap()
            .is_none()
    );
    assert!(
        h.manager
            .validate_session(&fresh.id)
            .await
            .unwrap()
            .is_some()
    );

    // Only the new password authenticates.
    assert!(
        h.accounts
            .login(login_input("alice@example.com", "hunter22"))
            .await
            .is_err()
    );
    assert!(
        h.accounts
            .login(login_input("alice@example.com", "correct-horse"))
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn password_change_requires_the_current_password() {
    let h = harness().await;
    let (user, _) = h
        .accounts
        .register(register_input("alice@example.com"))
        .await
        .unwrap();

    let err = h
        .accounts
        .change_password(
            user.id,
            ChangePasswordInput {
                current_password: "wrong".to_string(),
                new_password: "correct-horse".to_string(),
                new_password_confirm: "correct-horse".to_string(),
            },
        )
        .await
        .unwrap_err();

    assert!(err.is_kind(ErrorKind::Validation));
    assert!(err.fields.unwrap().get("current_password").is_some());
}

#[tokio::test]
async fn force_logout_clears_every_device() {
    let h = harness().await;
    let (user, first) = h
        .accounts
        .register(register_input("alice@example.com"))
        .await
        .unwrap();
    let (_, second) = h
        .accounts
        .login(login_input("alice@example.com", "hunter22"))
        .await
        .unwrap();

    let removed = h.admin.force_logout(user.id).await.unwrap();
    assert_eq!(removed, 2);
    assert!(h.sessions.is_empty());
    assert!(h.manager.validate_session(&first.id).await.unwrap().is_none());
    assert!(
        h.manager
            .validate_session(&second.id)
            .await
            .unwrap()
            .is_none()
    );

    // Re-login works and the new session validates.
    let (_, fresh) = h
        .accounts
        .login(login_input("alice@example.com", "hunter22"))
        .await
        .unwrap();
    assert!(
        h.manager
            .validate_session(&fresh.id)
            .await
            .unwrap()
            .is_some()
    );
}

#[tokio::test]
async fn unban_restores_login() {
    let h = harness().await;
    let (user, _) = h
        .accounts
        .register(register_input("alice@example.com"))
        .await
        .unwrap();

    h.admin.ban_user(user.id, Some("spam")).await.unwrap();
    let banned = h.users.find_by_id(user.id).await.unwrap().unwrap();
    assert!(banned.banned);
    assert_eq!(banned.ban_reason.as_deref(), Some("spam"));

    h.admin.unban_user(user.id).await.unwrap();
    let restored = h.users.find_by_id(user.id).await.unwrap().unwrap();
    assert!(!restored.banned);
    assert!(restored.ban_reason.is_none());

    assert!(
        h.accounts
            .login(login_input("alice@example.com", "hunter22"))
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn admin_lists_user_sessions() {
    let h = harness().await;
    let (user, _) = h
        .accounts
        .register(register_input("alice@example.com"))
        .await
        .unwrap();
    h.accounts
        .login(login_input("alice@example.com", "hunter22"))
        .await
        .unwrap();

    let sessions = h.admin.list_user_sessions(user.id).await.unwrap();
    assert_eq!(sessions.len(), 2);
    assert!(sessions.iter().all(|s| s.user_id == user.id));
}

#[tokio::test]
async fn admin_operations_on_missing_users_fail() {
    let h = harness().await;
    let ghost = uuid::Uuid::new_v4();

    assert!(
        h.admin
            .ban_user(ghost, None)
            .await
            .unwrap_err()
            .is_kind(ErrorKind::NotFound)
    );
    assert!(
        h.admin
            .force_logout(ghost)
            .await
            .unwrap_err()
            .is_kind(ErrorKind::NotFound)
    );
}
