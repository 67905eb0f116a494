//! Event endpoints.

use crate::{
    api::AppState,
    auth::User,
    core::event::EventInput,
    entities::event,
    errors::Result,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

/// `GET /api/events`
pub async fn list_events(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<event::Model>>> {
    Ok(Json(state.repo.list_events(&user.id).await?))
}

/// `POST /api/events`
pub async fn create_event(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(input): Json<EventInput>,
) -> Result<(StatusCode, Json<event::Model>)> {
    let created = state.repo.upsert_event(&user.id, None, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /api/events/{id}`
pub async fn get_event(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(event_id): Path<i64>,
) -> Result<Json<event::Model>> {
    Ok(Json(state.repo.get_event(&user.id, event_id).await?))
}

/// `PUT /api/events/{id}`
pub async fn update_event(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(event_id): Path<i64>,
    Json(input): Json<EventInput>,
) -> Result<Json<event::Model>> {
    let updated = state
        .repo
        .upsert_event(&user.id, Some(event_id), input)
        .await?;
    Ok(Json(updated))
}

/// `DELETE /api/events/{id}`
pub async fn delete_event(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(event_id): Path<i64>,
) -> Result<StatusCode> {
    state.repo.delete_event(&user.id, event_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
