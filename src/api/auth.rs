use axum::extract::{FromRequestParts, State};
use axum::http::{header, request::Parts};
use axum::{async_trait, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::AppState;
use crate::domain::{Session, ROLE_ADMIN};
use crate::error::AppError;
use crate::identity;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub roles: Vec<String>,
}

/// Exchange credentials for a bearer token. Unknown email and wrong
/// password answer identically, so the endpoint leaks nothing about which
/// accounts exist.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let user = state
        .repo
        .find_user_by_email(request.email.trim())
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !identity::verify_password(&request.password, &user.password_hash) {
        return Err(AppError::Unauthorized);
    }

    let session = Session::issue(user.id);
    state.repo.insert_session(&session).await?;
    let roles = state.repo.roles_of_user(user.id).await?;

    info!(user_id = user.id, "login succeeded");
    Ok(Json(LoginResponse {
        token: session.token,
        expires_at: session.expires_at,
        roles,
    }))
}

/// Extractor guarding administrator endpoints. Wants a valid, unexpired
/// bearer session whose user holds the Admin role; anything less is 401,
/// a valid session without the role is 403.
#[derive(Debug, Clone, Copy)]
pub struct AdminUser {
    pub user_id: i64,
}

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let token = header_value
            .trim()
            .strip_prefix("Bearer ")
            .or_else(|| header_value.trim().strip_prefix("bearer "))
            .ok_or(AppError::Unauthorized)?
            .trim();

        let session = state
            .repo
            .find_session(token)
            .await?
            .ok_or(AppError::Unauthorized)?;
        if session.is_expired(Utc::now()) {
            return Err(AppError::Unauthorized);
        }

        let roles = state.repo.roles_of_user(session.user_id).await?;
        if !roles.iter().any(|role| role == ROLE_ADMIN) {
            return Err(AppError::Forbidden);
        }

        Ok(AdminUser {
            user_id: session.user_id,
        })
    }
}
