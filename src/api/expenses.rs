//! Expense endpoints.

use crate::{
    api::{AppState, upload::read_receipt},
    auth::User,
    core::expense::{ExpenseDetail, ExpenseInput},
    entities::expense,
    errors::Result,
};
use axum::{
    Extension, Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

/// Query of `GET /api/expenses`.
#[derive(Debug, Default, Deserialize)]
pub struct ExpenseFilter {
    /// Only expenses of this event
    pub event_id: Option<i64>,
}

/// `GET /api/expenses`
pub async fn list_expenses(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(filter): Query<ExpenseFilter>,
) -> Result<Json<Vec<ExpenseDetail>>> {
    let details = state
        .repo
        .list_expense_details(&user.id, filter.event_id)
        .await?;
    Ok(Json(details))
}

/// `POST /api/expenses`
pub async fn create_expense(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(input): Json<ExpenseInput>,
) -> Result<(StatusCode, Json<expense::Model>)> {
    let created = state.repo.upsert_expense(&user.id, None, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /api/expenses/{id}`
pub async fn update_expense(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(expense_id): Path<i64>,
    Json(input): Json<ExpenseInput>,
) -> Result<Json<expense::Model>> {
    let updated = state
        .repo
        .upsert_expense(&user.id, Some(expense_id), input)
        .await?;
    Ok(Json(updated))
}

/// `DELETE /api/expenses/{id}`
pub async fn delete_expense(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(expense_id): Path<i64>,
) -> Result<StatusCode> {
    state.repo.delete_expense(&user.id, expense_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/expenses/{id}/receipt`
///
/// Checks the expense is the caller's, stores the uploaded file, then records
/// it on the expense.
pub async fn attach_receipt(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(expense_id): Path<i64>,
    mut multipart: Multipart,
) -> Result<Json<expense::Model>> {
    state.repo.get_expense(&user.id, expense_id).await?;
    let upload = read_receipt(&mut multipart).await?;
    let stored = state.repo.upload_receipt(upload).await?;
    let updated = state
        .repo
        .attach_receipt(&user.id, expense_id, stored)
        .await?;
    Ok(Json(updated))
}
