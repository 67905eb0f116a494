//! Report generation - Creates the per-event profit/loss report and the
//! dashboard summary from already-fetched rows.

use crate::{
    core::{
        analytics::{
            CategoryShare, ExpenseBucket, Period, category_breakdown, expense_trend,
            profit_margin,
        },
        event::EventStatus,
        expense::ExpenseDetail,
    },
    entities::{event, expense},
};
use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Formats a money or percentage value with exactly two decimals, rounding
/// halves away from zero.
#[must_use]
pub fn format_two_decimals(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}")
}

/// One category line of a profit/loss report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportCategory {
    /// Category name
    pub category: String,
    /// Amount spent, two decimals
    pub amount: String,
    /// Number of expenses
    pub count: usize,
}

/// Profit/loss report for a single event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitLossReport {
    /// Event the report covers
    pub event_name: String,
    /// Revenue used for the report, two decimals
    pub total_revenue: String,
    /// Sum of the event's expenses, two decimals
    pub total_expenses: String,
    /// Revenue minus expenses, two decimals
    pub profit: String,
    /// Profit as a percentage of revenue, two decimals
    pub profit_margin: String,
    /// Expenses grouped by category, largest first
    pub category_breakdown: Vec<ReportCategory>,
    /// When the report was produced
    pub generated_at: DateTime<Utc>,
}

/// Builds the profit/loss report for `event`.
///
/// Only expenses charged to the event are counted. Revenue is the event's
/// booked amount unless `revenue` overrides it.
#[must_use]
pub fn generate_profit_loss_report(
    event: &event::Model,
    expenses: &[ExpenseDetail],
    revenue: Option<Decimal>,
    generated_at: DateTime<Utc>,
) -> ProfitLossReport {
    let own: Vec<ExpenseDetail> = expenses
        .iter()
        .filter(|detail| detail.expense.event_id == event.id)
        .cloned()
        .collect();

    let revenue = revenue.unwrap_or(event.booked_amount);
    let total_expenses: Decimal = own.iter().map(|d| d.expense.amount).sum();
    let profit = revenue - total_expenses;

    ProfitLossReport {
        event_name: event.name.clone(),
        total_revenue: format_two_decimals(revenue),
        total_expenses: format_two_decimals(total_expenses),
        profit: format_two_decimals(profit),
        profit_margin: format_two_decimals(profit_margin(profit, revenue)),
        category_breakdown: category_breakdown(&own)
            .into_iter()
            .map(|share| ReportCategory {
                category: share.category,
                amount: format_two_decimals(share.amount),
                count: share.count,
            })
            .collect(),
        generated_at,
    }
}

/// Figures shown on the landing dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    /// Events not yet held
    pub planned_events: usize,
    /// Events already held
    pub completed_events: usize,
    /// Sum of all the owner's expenses
    pub total_expenses: Decimal,
    /// Most recently recorded expenses
    pub recent_expenses: Vec<ExpenseDetail>,
    /// All expenses grouped by category
    pub category_breakdown: Vec<CategoryShare>,
    /// All expenses grouped by month of expense date
    pub monthly_trend: Vec<ExpenseBucket>,
}

/// Builds the dashboard from the owner's events, all their expenses and the
/// most recent ones.
#[must_use]
pub fn build_dashboard(
    events: &[event::Model],
    expenses: &[ExpenseDetail],
    recent_expenses: Vec<ExpenseDetail>,
) -> DashboardSummary {
    let count_status = |status: EventStatus| {
        events
            .iter()
            .filter(|e| e.status == status.as_str())
            .count()
    };
    let models: Vec<expense::Model> = expenses.iter().map(|d| d.expense.clone()).collect();

    DashboardSummary {
        planned_events: count_status(EventStatus::Planned),
        completed_events: count_status(EventStatus::Completed),
        total_expenses: models.iter().map(|e| e.amount).sum(),
        recent_expenses,
        category_breakdown: category_breakdown(expenses),
        monthly_trend: expense_trend(&models, Period::Month),
    }
}
