//! Profit/loss report and file exports for a single event.

use crate::{
    api::AppState,
    auth::User,
    core::{
        export::{csv_filename, expenses_to_csv, report_filename, report_to_json},
        report::{ProfitLossReport, generate_profit_loss_report},
        validate_amount,
    },
    errors::Result,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::IntoResponse,
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Query of the report endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    /// Revenue to report instead of the booked amount
    pub revenue: Option<Decimal>,
}

async fn build_report(
    state: &AppState,
    owner: &str,
    event_id: i64,
    revenue: Option<Decimal>,
) -> Result<ProfitLossReport> {
    if let Some(amount) = revenue {
        validate_amount(amount)?;
    }

    let event = state.repo.get_event(owner, event_id).await?;
    let expenses = state
        .repo
        .list_expense_details(owner, Some(event_id))
        .await?;
    Ok(generate_profit_loss_report(
        &event,
        &expenses,
        revenue,
        Utc::now(),
    ))
}

fn attachment(
    content_type: &'static str,
    filename: &str,
    body: String,
) -> impl IntoResponse + use<> {
    (
        [
            (CONTENT_TYPE, content_type.to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
}

/// `GET /api/reports/events/{id}`
pub async fn profit_loss(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(event_id): Path<i64>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ProfitLossReport>> {
    let report = build_report(&state, &user.id, event_id, query.revenue).await?;
    Ok(Json(report))
}

/// `GET /api/reports/events/{id}/expenses.csv`
pub async fn expenses_csv(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(event_id): Path<i64>,
) -> Result<impl IntoResponse> {
    let event = state.repo.get_event(&user.id, event_id).await?;
    let expenses = state
        .repo
        .list_expense_details(&user.id, Some(event_id))
        .await?;

    let csv = expenses_to_csv(&expenses)?;
    let filename = csv_filename(
        &format!("{}-expenses", event.name),
        Utc::now().date_naive(),
    );
    Ok(attachment("text/csv; charset=utf-8", &filename, csv))
}

/// `GET /api/reports/events/{id}/report.json`
pub async fn report_json(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(event_id): Path<i64>,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse> {
    let report = build_report(&state, &user.id, event_id, query.revenue).await?;
    let json = report_to_json(&report)?;
    let filename = report_filename(&report.event_name, report.generated_at.date_naive());
    Ok(attachment("application/json", &filename, json))
}
