//! Route definitions for the QuillHub HTTP API.
//!
//! All routes are mounted under `/api`. The router receives `AppState`
//! and passes it to every handler via Axum's `State` extractor.

use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Builds the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(admin_routes())
        .merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Auth endpoints: register, login, logout, me, password change.
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/me", get(handlers::auth::me))
        .route("/users/me/password", put(handlers::auth::change_password))
}

/// Admin-only endpoints. The role check lives in each handler, after
/// session validation.
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/users/{id}", get(handlers::admin::get_user))
        .route("/admin/users/{id}/ban", post(handlers::admin::ban_user))
        .route("/admin/users/{id}/unban", post(handlers::admin::unban_user))
        .route(
            "/admin/users/{id}/logout",
            post(handlers::admin::force_logout),
        )
        .route(
            "/admin/users/{id}/sessions",
            get(handlers::admin::list_user_sessions),
        )
}

/// Health check endpoints (no auth required).
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health_check))
}
