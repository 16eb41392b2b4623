//! Auth handlers: register, login, logout, me, change-password.
//!
//! The session id only ever travels in an HttpOnly cookie, so it is
//! never exposed to page scripts and never appears in response bodies.

use axum::Json;
use axum::extract::State;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use quillhub_auth::account::{ChangePasswordInput, LoginInput, RegisterInput};
use quillhub_core::config::AppConfig;
use quillhub_entity::session::Session;

use crate::dto::response::{ApiResponse, MessageResponse, ProfileResponse, UserResponse};
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(input): Json<RegisterInput>,
) -> Result<(CookieJar, Json<ApiResponse<UserResponse>>), ApiError> {
    let (user, session) = state.accounts.register(input).await?;
    let jar = jar.add(session_cookie(&state.config, &session));
    Ok((jar, Json(ApiResponse::ok(UserResponse::from(&user)))))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(input): Json<LoginInput>,
) -> Result<(CookieJar, Json<ApiResponse<UserResponse>>), ApiError> {
    let (user, session) = state.accounts.login(input).await?;
    let jar = jar.add(session_cookie(&state.config, &session));
    Ok((jar, Json(ApiResponse::ok(UserResponse::from(&user)))))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    current: CurrentUser,
    jar: CookieJar,
) -> Result<(CookieJar, Json<ApiResponse<MessageResponse>>), ApiError> {
    state.accounts.logout(&current.session_id).await?;
    let jar = jar.remove(removal_cookie(&state.config));
    Ok((
        jar,
        Json(ApiResponse::ok(MessageResponse::new("Logged out."))),
    ))
}

/// GET /api/auth/me
pub async fn me(current: CurrentUser) -> Json<ApiResponse<ProfileResponse>> {
    Json(ApiResponse::ok(ProfileResponse::from(&current.0)))
}

/// PUT /api/users/me/password
///
/// Every other session dies with the old password; the cookie is swapped
/// for the one fresh session so this device stays signed in.
pub async fn change_password(
    State(state): State<AppState>,
    current: CurrentUser,
    jar: CookieJar,
    Json(input): Json<ChangePasswordInput>,
) -> Result<(CookieJar, Json<ApiResponse<MessageResponse>>), ApiError> {
    let session = state.accounts.change_password(current.user_id, input).await?;
    let jar = jar.add(session_cookie(&state.config, &session));
    Ok((
        jar,
        Json(ApiResponse::ok(MessageResponse::new("Password changed."))),
    ))
}

/// Builds the session transport cookie.
fn session_cookie(config: &AppConfig, session: &Session) -> Cookie<'static> {
    Cookie::build((config.session.cookie_name.clone(), session.id.clone()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .secure(config.server.secure_cookies)
        .max_age(time::Duration::days(config.session.ttl_days as i64))
        .build()
}

/// Builds the cookie used to clear the session cookie on logout.
fn removal_cookie(config: &AppConfig) -> Cookie<'static> {
    Cookie::build(config.session.cookie_name.clone())
        .path("/")
        .build()
}
