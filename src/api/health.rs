use axum::extract::State;
use axum::Json;

use crate::api::AppState;
use crate::error::AppError;

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Readiness includes a store round trip; a pod with a dead pool should
/// fall out of rotation.
pub async fn ready(State(state): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    state
        .repo
        .ping()
        .await
        .map_err(|e| AppError::Internal(format!("store unreachable: {}", e)))?;

    Ok(Json(serde_json::json!({
        "status": "ready",
        "database": state.config.database.provider().as_str(),
    })))
}
