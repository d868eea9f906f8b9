use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::AppState;
use crate::domain::TattooStyle;
use crate::error::AppError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StylesResponse {
    pub styles: Vec<TattooStyle>,
}

/// The seeded style list, in seed order. Used by the gallery filter and
/// the booking form.
pub async fn get_styles(State(state): State<AppState>) -> Result<Json<StylesResponse>, AppError> {
    let styles = state.repo.list_styles().await?;
    Ok(Json(StylesResponse { styles }))
}
