//! Analytics and dashboard endpoints.
//!
//! Each handler fetches the caller's rows once and hands them to the pure
//! aggregation functions.

use crate::{
    api::AppState,
    auth::User,
    core::{
        analytics::{
            EventProfit, EventSort, ExpenseBucket, Period, PeriodSummary, ProfitSummary,
            aggregate_by_period, event_profitability, expense_trend, sort_event_profits,
            summarize,
        },
        report::{DashboardSummary, build_dashboard},
    },
    errors::Result,
};
use axum::{
    Extension, Json,
    extract::{Query, State},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Number of expenses listed on the dashboard.
pub const RECENT_EXPENSES: u64 = 10;

/// Query of `GET /api/analytics/events`.
#[derive(Debug, Default, Deserialize)]
pub struct EventsQuery {
    /// Ordering of the rows, profit when omitted
    #[serde(default)]
    pub sort: EventSort,
}

/// `GET /api/analytics/events`
pub async fn event_profits(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(query): Query<EventsQuery>,
) -> Result<Json<Vec<EventProfit>>> {
    let events = state.repo.list_events(&user.id).await?;
    let expenses = state.repo.list_expenses(&user.id).await?;

    let mut rows = event_profitability(&events, &expenses);
    sort_event_profits(&mut rows, query.sort);
    Ok(Json(rows))
}

/// Query of `GET /api/analytics/periods`.
#[derive(Debug, Default, Deserialize)]
pub struct PeriodQuery {
    /// Grouping mode, month when omitted
    pub period: Option<String>,
    /// First day of a custom range
    pub start: Option<NaiveDate>,
    /// Last day of a custom range
    pub end: Option<NaiveDate>,
}

/// Answer of `GET /api/analytics/periods`.
#[derive(Debug, Serialize)]
pub struct PeriodReport {
    /// Profit grouped by event date
    pub revenue: Vec<PeriodSummary>,
    /// Expenses grouped by expense date
    pub expenses: Vec<ExpenseBucket>,
}

/// `GET /api/analytics/periods`
pub async fn period_profits(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<PeriodReport>> {
    let period = Period::from_parts(
        query.period.as_deref().unwrap_or("month"),
        query.start,
        query.end,
    )?;

    let events = state.repo.list_events(&user.id).await?;
    let expenses = state.repo.list_expenses(&user.id).await?;

    Ok(Json(PeriodReport {
        revenue: aggregate_by_period(&events, &expenses, period),
        expenses: expense_trend(&expenses, period),
    }))
}

/// `GET /api/analytics/summary`
pub async fn summary(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<ProfitSummary>> {
    let events = state.repo.list_events(&user.id).await?;
    let expenses = state.repo.list_expenses(&user.id).await?;
    Ok(Json(summarize(&event_profitability(&events, &expenses))))
}

/// `GET /api/dashboard`
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<DashboardSummary>> {
    let events = state.repo.list_events(&user.id).await?;
    let expenses = state.repo.list_expense_details(&user.id, None).await?;
    let recent = state.repo.recent_expenses(&user.id, RECENT_EXPENSES).await?;
    Ok(Json(build_dashboard(&events, &expenses, recent)))
}
