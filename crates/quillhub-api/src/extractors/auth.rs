//! `CurrentUser` extractor: reads the session cookie, validates the
//! session, and injects the resulting context.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;

use quillhub_auth::session::SessionContext;
use quillhub_core::error::AppError;

use crate::error::ApiError;
use crate::state::AppState;

/// Validated session context available in handlers.
///
/// Extraction fails with 401 when the cookie is absent or the session
/// does not validate; the handler never sees which case it was.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub SessionContext);

impl std::ops::Deref for CurrentUser {
    type Target = SessionContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let cookie_name = state.config.session.cookie_name.as_str();

        let session_id = jar
            .get(cookie_name)
            .map(|c| c.value().to_string())
            .ok_or_else(|| ApiError(AppError::authentication("Authentication required")))?;

        let context = state
            .sessions
            .validate_session(&session_id)
            .await
            .map_err(ApiError)?
            .ok_or_else(|| ApiError(AppError::authentication("Authentication required")))?;

        Ok(CurrentUser(context))
    }
}
