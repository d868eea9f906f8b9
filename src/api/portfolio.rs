use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::api::auth::AdminUser;
use crate::api::AppState;
use crate::domain::{NewPortfolioItem, PortfolioItem};
use crate::error::AppError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioResponse {
    pub count: i64,
    pub items: Vec<PortfolioItemDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioItemDto {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub style: String,
    pub created_at: String,
}

impl PortfolioItemDto {
    fn from_domain(item: PortfolioItem) -> PortfolioItemDto {
        PortfolioItemDto {
            id: item.id,
            title: item.title,
            description: item.description,
            image_url: item.image_url,
            style: item.style,
            created_at: item.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemResponse {
    pub id: i64,
}

/// Public gallery, newest work first.
pub async fn list_items(
    State(state): State<AppState>,
) -> Result<Json<PortfolioResponse>, AppError> {
    let items = state.repo.list_portfolio_items().await?;

    let count = items.len() as i64;
    let items = items
        .into_iter()
        .map(PortfolioItemDto::from_domain)
        .collect();

    Ok(Json(PortfolioResponse { count, items }))
}

pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PortfolioItemDto>, AppError> {
    let item = state
        .repo
        .get_portfolio_item(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("portfolio item {}", id)))?;

    Ok(Json(PortfolioItemDto::from_domain(item)))
}

/// Publish a new portfolio piece. Administrator only.
pub async fn create_item(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(item): Json<NewPortfolioItem>,
) -> Result<(StatusCode, Json<CreateItemResponse>), AppError> {
    item.validate().map_err(AppError::Validation)?;

    let id = state.repo.insert_portfolio_item(&item).await?;

    Ok((StatusCode::CREATED, Json(CreateItemResponse { id })))
}
