//! Category endpoints.

use crate::{api::AppState, entities::category, errors::Result};
use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

/// Body of `POST /api/categories`.
#[derive(Debug, Deserialize)]
pub struct NewCategory {
    /// Category name
    pub name: String,
}

/// `GET /api/categories`
pub async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<category::Model>>> {
    Ok(Json(state.repo.list_categories().await?))
}

/// `POST /api/categories`
pub async fn create_category(
    State(state): State<AppState>,
    Json(body): Json<NewCategory>,
) -> Result<(StatusCode, Json<category::Model>)> {
    let created = state.repo.create_category(&body.name).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
