//! Admin handlers. Every handler passes the authorization gate before
//! touching the admin service.

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use crate::dto::request::BanRequest;
use crate::dto::response::{
    ApiResponse, MessageResponse, RemovedResponse, SessionResponse, UserResponse,
};
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::state::AppState;

/// GET /api/admin/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    state.gate.require_admin(&current)?;
    let user = state.admin.find_user(user_id).await?;
    Ok(Json(ApiResponse::ok(UserResponse::from(&user))))
}

/// POST /api/admin/users/{id}/ban
pub async fn ban_user(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(user_id): Path<Uuid>,
    Json(req): Json<BanRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.gate.require_admin(&current)?;
    state.admin.ban_user(user_id, req.reason.as_deref()).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("User banned."))))
}

/// POST /api/admin/users/{id}/unban
pub async fn unban_user(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.gate.require_admin(&current)?;
    state.admin.unban_user(user_id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("User unbanned."))))
}

/// POST /api/admin/users/{id}/logout
pub async fn force_logout(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<RemovedResponse>>, ApiError> {
    state.gate.require_admin(&current)?;
    let removed = state.admin.force_logout(user_id).await?;
    Ok(Json(ApiResponse::ok(RemovedResponse { removed })))
}

/// GET /api/admin/users/{id}/sessions
pub async fn list_user_sessions(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<SessionResponse>>>, ApiError> {
    state.gate.require_admin(&current)?;
    let sessions = state.admin.list_user_sessions(user_id).await?;
    Ok(Json(ApiResponse::ok(
        sessions.iter().map(SessionResponse::from).collect(),
    )))
}
