//! Health check handlers.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use quillhub_core::error::AppError;

use crate::error::ApiError;
use crate::state::AppState;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Database connectivity, when a pool is configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
}

/// GET /api/health
///
/// Pings the database when a pool is wired in; in-memory deployments
/// report service status only.
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, ApiError> {
    let database = match &state.db {
        Some(db) => {
            if !db.health_check().await.unwrap_or(false) {
                return Err(ApiError(AppError::service_unavailable(
                    "Database unavailable",
                )));
            }
            Some("ok".to_string())
        }
        None => None,
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        database,
    }))
}
