//! End-to-end HTTP tests over the in-memory stores: cookie issuance,
//! session validation, and the admin surface.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::Utc;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use quillhub_api::{AppState, build_router};
use quillhub_auth::account::{AccountService, AdminService, RegistrationPolicy};
use quillhub_auth::memory::{MemoryCredentialStore, MemorySessionStore};
use quillhub_auth::{PasswordHasher, SessionManager};
use quillhub_core::config::AppConfig;
use quillhub_core::traits::{CredentialStore, SessionStore};
use quillhub_entity::user::{User, UserRole};

struct TestApp {
    router: Router,
    users: Arc<MemoryCredentialStore>,
}

struct TestResponse {
    status: StatusCode,
    body: Value,
    cookie: Option<String>,
}

impl TestApp {
    fn new() -> Self {
        let config = Arc::new(AppConfig::default());
        let users = Arc::new(MemoryCredentialStore::new());
        let sessions = Arc::new(MemorySessionStore::new());
        let manager = SessionManager::new(
            sessions.clone() as Arc<dyn SessionStore>,
            users.clone() as Arc<dyn CredentialStore>,
            config.session.clone(),
        );
        let accounts = AccountService::new(
            users.clone() as Arc<dyn CredentialStore>,
            manager.clone(),
            PasswordHasher::new(),
            RegistrationPolicy::open(),
        )
        .unwrap();
        let admin = AdminService::new(users.clone() as Arc<dyn CredentialStore>, manager.clone());
        let state = AppState::new(config, accounts, admin, manager, None);

        Self {
            router: build_router(state),
            users,
        }
    }

    async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        cookie: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(String::from);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        TestResponse {
            status,
            body,
            cookie,
        }
    }

    async fn register(&self, email: &str) -> TestResponse {
        self.request(
            "POST",
            "/api/auth/register",
            Some(json!({
                "name": "Alice",
                "email": email,
                "password": "hunter22",
                "password_confirm": "hunter22",
            })),
            None,
        )
        .await
    }

    async fn login(&self, email: &str, password: &str) -> TestResponse {
        self.request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": email, "password": password })),
            None,
        )
        .await
    }

    /// Seeds an admin account directly in the store and signs it in.
    async fn login_as_admin(&self) -> String {
        let hasher = PasswordHasher::new();
        let now = Utc::now();
        self.users
            .insert_user(User {
                id: Uuid::new_v4(),
                name: "Root".to_string(),
                email: "root@example.com".to_string(),
                password_hash: hasher.hash("adminpass").unwrap(),
                role: UserRole::Admin,
                banned: false,
                ban_reason: None,
                session_version: 0,
                created_at: now,
                updated_at: now,
                last_login_at: None,
            })
            .await;

        let response = self.login("root@example.com", "adminpass").await;
        assert_eq!(response.status, StatusCode::OK);
        response.cookie.unwrap()
    }
}

#[tokio::test]
async fn health_requires_no_auth() {
    let app = TestApp::new();
    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    // No pool wired in, so no database field is reported.
    assert!(response.body.get("database").is_none());
}

#[tokio::test]
async fn register_sets_cookie_and_me_works() {
    let app = TestApp::new();

    let response = app.register("alice@example.com").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["email"], "alice@example.com");
    assert!(response.body["data"].get("password_hash").is_none());

    let cookie = response.cookie.expect("registration should set a cookie");
    assert!(cookie.starts_with("session="));

    let me = app.request("GET", "/api/auth/me", None, Some(&cookie)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["data"]["email"], "alice@example.com");
    assert_eq!(me.body["data"]["role"], "user");
}

#[tokio::test]
async fn me_without_cookie_is_unauthorized() {
    let app = TestApp::new();
    let response = app.request("GET", "/api/auth/me", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn duplicate_registration_returns_field_error() {
    let app = TestApp::new();
    app.register("alice@example.com").await;

    let response = app.register("alice@example.com").await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        response.body["fields"]["email"][0],
        "Email already in use."
    );
}

#[tokio::test]
async fn bad_credentials_are_unauthorized() {
    let app = TestApp::new();
    app.register("alice@example.com").await;

    let wrong = app.login("alice@example.com", "wrong").await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);

    let unknown = app.login("nobody@example.com", "hunter22").await;
    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.body["message"], unknown.body["message"]);
}

#[tokio::test]
async fn logout_invalidates_the_cookie() {
    let app = TestApp::new();
    let cookie = app.register("alice@example.com").await.cookie.unwrap();

    let logout = app
        .request("POST", "/api/auth/logout", None, Some(&cookie))
        .await;
    assert_eq!(logout.status, StatusCode::OK);

    let me = app.request("GET", "/api/auth/me", None, Some(&cookie)).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn password_change_swaps_the_session() {
    let app = TestApp::new();
    let old_cookie = app.register("alice@example.com").await.cookie.unwrap();

    let response = app
        .request(
            "PUT",
            "/api/users/me/password",
            Some(json!({
                "current_password": "hunter22",
                "new_password": "correct-horse",
                "new_password_confirm": "correct-horse",
            })),
            Some(&old_cookie),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let new_cookie = response.cookie.expect("password change should rotate the cookie");
    assert_ne!(new_cookie, old_cookie);

    let stale = app
        .request("GET", "/api/auth/me", None, Some(&old_cookie))
        .await;
    assert_eq!(stale.status, StatusCode::UNAUTHORIZED);

    let fresh = app
        .request("GET", "/api/auth/me", None, Some(&new_cookie))
        .await;
    assert_eq!(fresh.status, StatusCode::OK);
}

#[tokio::test]
async fn admin_routes_reject_regular_users() {
    let app = TestApp::new();
    let response = app.register("alice@example.com").await;
    let cookie = response.cookie.unwrap();
    let user_id = response.body["data"]["id"].as_str().unwrap().to_string();

    let forbidden = app
        .request(
            "POST",
            &format!("/api/admin/users/{user_id}/ban"),
            Some(json!({ "reason": "spam" })),
            Some(&cookie),
        )
        .await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_ban_locks_the_user_out() {
    let app = TestApp::new();
    let response = app.register("alice@example.com").await;
    let alice_cookie = response.cookie.unwrap();
    let alice_id = response.body["data"]["id"].as_str().unwrap().to_string();

    let admin_cookie = app.login_as_admin().await;
    let banned = app
        .request(
            "POST",
            &format!("/api/admin/users/{alice_id}/ban"),
            Some(json!({ "reason": "spam" })),
            Some(&admin_cookie),
        )
        .await;
    assert_eq!(banned.status, StatusCode::OK);

    // Alice's live session dies at its next validation.
    let me = app
        .request("GET", "/api/auth/me", None, Some(&alice_cookie))
        .await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);

    // And she cannot sign back in.
    let login = app.login("alice@example.com", "hunter22").await;
    assert_eq!(login.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_force_logout_reports_removed_sessions() {
    let app = TestApp::new();
    let response = app.register("alice@example.com").await;
    let alice_id = response.body["data"]["id"].as_str().unwrap().to_string();
    app.login("alice@example.com", "hunter22").await;

    let admin_cookie = app.login_as_admin().await;
    let result = app
        .request(
            "POST",
            &format!("/api/admin/users/{alice_id}/logout"),
            None,
            Some(&admin_cookie),
        )
        .await;

    assert_eq!(result.status, StatusCode::OK);
    assert_eq!(result.body["data"]["removed"], 2);
}

#[tokio::test]
async fn admin_lists_sessions_without_ids() {
    let app = TestApp::new();
    let response = app.register("alice@example.com").await;
    let alice_id = response.body["data"]["id"].as_str().unwrap().to_string();

    let admin_cookie = app.login_as_admin().await;
    let list = app
        .request(
            "GET",
            &format!("/api/admin/users/{alice_id}/sessions"),
            None,
            Some(&admin_cookie),
        )
        .await;

    assert_eq!(list.status, StatusCode::OK);
    let sessions = list.body["data"].as_array().unwrap();
    assert_eq!(sessions.len(), 1);
    assert!(sessions[0].get("expires_at").is_some());
    // Session ids are bearer secrets and never leave the server.
    assert!(sessions[0].get("id").is_none());
}
