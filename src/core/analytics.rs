//! Profitability analytics.
//!
//! Everything in this module is pure: functions take the owner's events and
//! expenses as slices and return aggregated rows. Nothing here touches the
//! database, so the same code serves the API handlers, the reports and tests.
//!
//! Profit for an event is its booked amount minus the sum of its expenses.
//! Margin is profit as a percentage of booked amount and is defined as zero
//! when the booked amount is zero.

use crate::{
    core::expense::ExpenseDetail,
    entities::{event, expense},
    errors::{Error, Result},
};
use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Category label used when an expense has no resolvable category.
pub const UNCATEGORIZED: &str = "Other";

/// Profit as a percentage of revenue, or zero when there is no revenue.
#[must_use]
pub fn profit_margin(profit: Decimal, revenue: Decimal) -> Decimal {
    if revenue <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    profit
        .checked_div(revenue)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO)
}

/// Profit figures for a single event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventProfit {
    /// Event id
    pub event_id: i64,
    /// Event name
    pub event_name: String,
    /// Client name
    pub client_name: String,
    /// Day of the event
    pub event_date: NaiveDate,
    /// Lifecycle status
    pub status: String,
    /// Guest count
    pub pax: i32,
    /// Booked revenue
    pub booked_amount: Decimal,
    /// Sum of the event's expenses
    pub total_expenses: Decimal,
    /// Booked amount minus expenses
    pub profit: Decimal,
    /// Profit as a percentage of booked amount
    pub profit_margin: Decimal,
    /// Number of expenses charged to the event
    pub expense_count: usize,
}

/// Computes profit figures for every event, in input order.
///
/// Expenses whose event is not in `events` are ignored.
#[must_use]
pub fn event_profitability(
    events: &[event::Model],
    expenses: &[expense::Model],
) -> Vec<EventProfit> {
    let mut totals: HashMap<i64, (Decimal, usize)> = HashMap::new();
    for expense in expenses {
        let entry = totals.entry(expense.event_id).or_default();
        entry.0 += expense.amount;
        entry.1 += 1;
    }

    events
        .iter()
        .map(|event| {
            let (total_expenses, expense_count) =
                totals.get(&event.id).copied().unwrap_or_default();
            let profit = event.booked_amount - total_expenses;
            EventProfit {
                event_id: event.id,
                event_name: event.name.clone(),
                client_name: event.client_name.clone(),
                event_date: event.date,
                status: event.status.clone(),
                pax: event.pax,
                booked_amount: event.booked_amount,
                total_expenses,
                profit,
                profit_margin: profit_margin(profit, event.booked_amount),
                expense_count,
            }
        })
        .collect()
}

/// Orderings offered for the per-event table. All are descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSort {
    /// Highest profit first
    #[default]
    Profit,
    /// Highest margin first
    Margin,
    /// Most recent event first
    Date,
}

/// Sorts per-event rows in place. The sort is stable, so ties keep input order.
pub fn sort_event_profits(rows: &mut [EventProfit], sort: EventSort) {
    match sort {
        EventSort::Profit => rows.sort_by(|a, b| b.profit.cmp(&a.profit)),
        EventSort::Margin => rows.sort_by(|a, b| b.profit_margin.cmp(&a.profit_margin)),
        EventSort::Date => rows.sort_by(|a, b| b.event_date.cmp(&a.event_date)),
    }
}

/// Totals across all events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfitSummary {
    /// Sum of booked amounts
    pub total_revenue: Decimal,
    /// Sum of expenses
    pub total_expenses: Decimal,
    /// Revenue minus expenses
    pub total_profit: Decimal,
    /// Overall profit as a percentage of overall revenue
    pub profit_margin: Decimal,
    /// Unweighted mean of the per-event margins
    pub average_margin: Decimal,
    /// Number of events
    pub event_count: usize,
    /// Events with positive profit
    pub profitable_events: usize,
    /// Events with negative profit
    pub loss_events: usize,
}

/// Folds per-event rows into overall totals.
#[must_use]
pub fn summarize(rows: &[EventProfit]) -> ProfitSummary {
    let total_revenue: Decimal = rows.iter().map(|r| r.booked_amount).sum();
    let total_expenses: Decimal = rows.iter().map(|r| r.total_expenses).sum();
    let total_profit = total_revenue - total_expenses;
    let margin_sum: Decimal = rows.iter().map(|r| r.profit_margin).sum();
    let average_margin = if rows.is_empty() {
        Decimal::ZERO
    } else {
        margin_sum / Decimal::from(rows.len())
    };

    ProfitSummary {
        total_revenue,
        total_expenses,
        total_profit,
        profit_margin: profit_margin(total_profit, total_revenue),
        average_margin,
        event_count: rows.len(),
        profitable_events: rows.iter().filter(|r| r.profit > Decimal::ZERO).count(),
        loss_events: rows.iter().filter(|r| r.profit < Decimal::ZERO).count(),
    }
}

/// Calendar grouping used by the period views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    /// One group per day
    Day,
    /// One group per ISO week (Monday start)
    Week,
    /// One group per calendar month
    Month,
    /// One group per calendar quarter
    Quarter,
    /// One group per calendar year
    Year,
    /// One group per April-to-March fiscal year
    FiscalYear,
    /// A single group for an inclusive date range; dates outside it are dropped
    Custom {
        /// First day of the range
        start: NaiveDate,
        /// Last day of the range
        end: NaiveDate,
    },
}

/// The group a date falls into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodBucket {
    /// Sortable key, e.g. `2024-03`, `2024-Q1`, `FY2024`
    pub key: String,
    /// Display label, e.g. `Mar 2024`, `Q1 2024`, `FY 2024-25`
    pub label: String,
    /// First day of the period
    pub start: NaiveDate,
}

/// First month of the fiscal year.
const FISCAL_YEAR_START_MONTH: u32 = 4;

impl Period {
    /// Builds a period from its query-string name and optional range bounds.
    ///
    /// # Errors
    /// Returns a validation error for an unknown name, or for `custom` without
    /// both bounds or with `start` after `end`.
    pub fn from_parts(
        name: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Self> {
        match name {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "quarter" => Ok(Self::Quarter),
            "year" => Ok(Self::Year),
            "fiscal_year" => Ok(Self::FiscalYear),
            "custom" => match (start, end) {
                (Some(start), Some(end)) if start <= end => Ok(Self::Custom { start, end }),
                (Some(_), Some(_)) => Err(Error::validation(
                    "Custom range start must not be after its end",
                )),
                _ => Err(Error::validation(
                    "Custom range requires both start and end",
                )),
            },
            other => Err(Error::validation(format!("Unknown period: {other}"))),
        }
    }

    /// Returns the bucket `date` belongs to, or None when a custom range excludes it.
    #[must_use]
    pub fn bucket(&self, date: NaiveDate) -> Option<PeriodBucket> {
        let year = date.year();
        match *self {
            Self::Day => Some(PeriodBucket {
                key: date.format("%Y-%m-%d").to_string(),
                label: date.format("%d %b %Y").to_string(),
                start: date,
            }),
            Self::Week => {
                let iso = date.iso_week();
                let start =
                    date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
                Some(PeriodBucket {
                    key: format!("{:04}-W{:02}", iso.year(), iso.week()),
                    label: format!("Week {}, {}", iso.week(), iso.year()),
                    start,
                })
            }
            Self::Month => Some(PeriodBucket {
                key: date.format("%Y-%m").to_string(),
                label: date.format("%b %Y").to_string(),
                start: NaiveDate::from_ymd_opt(year, date.month(), 1)?,
            }),
            Self::Quarter => {
                let quarter = date.month().div_ceil(3);
                Some(PeriodBucket {
                    key: format!("{year:04}-Q{quarter}"),
                    label: format!("Q{quarter} {year}"),
                    start: NaiveDate::from_ymd_opt(year, (quarter - 1) * 3 + 1, 1)?,
                })
            }
            Self::Year => Some(PeriodBucket {
                key: format!("{year:04}"),
                label: year.to_string(),
                start: NaiveDate::from_ymd_opt(year, 1, 1)?,
            }),
            Self::FiscalYear => {
                let fy = if date.month() >= FISCAL_YEAR_START_MONTH {
                    year
                } else {
                    year - 1
                };
                Some(PeriodBucket {
                    key: format!("FY{fy:04}"),
                    label: format!("FY {}-{:02}", fy, (fy + 1).rem_euclid(100)),
                    start: NaiveDate::from_ymd_opt(fy, FISCAL_YEAR_START_MONTH, 1)?,
                })
            }
            Self::Custom { start, end } => (start..=end).contains(&date).then(|| PeriodBucket {
                key: format!("{start}..{end}"),
                label: format!("{start} to {end}"),
                start,
            }),
        }
    }
}

/// Profit figures for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodSummary {
    /// Sortable period key
    pub key: String,
    /// Display label
    pub label: String,
    /// First day of the period
    pub period_start: NaiveDate,
    /// Sum of booked amounts of events in the period
    pub total_revenue: Decimal,
    /// Sum of those events' expenses
    pub total_expenses: Decimal,
    /// Revenue minus expenses
    pub total_profit: Decimal,
    /// Profit as a percentage of revenue
    pub profit_margin: Decimal,
    /// Number of events in the period
    pub event_count: usize,
    /// Number of expenses charged to those events
    pub expense_count: usize,
}

/// Groups events (with their expenses) by the period of the event date.
///
/// Each event lands in exactly one group, so group totals add up to
/// [`summarize`] over the same input. Groups are returned oldest first.
#[must_use]
pub fn aggregate_by_period(
    events: &[event::Model],
    expenses: &[expense::Model],
    period: Period,
) -> Vec<PeriodSummary> {
    let mut groups: BTreeMap<String, PeriodSummary> = BTreeMap::new();

    for row in event_profitability(events, expenses) {
        let Some(bucket) = period.bucket(row.event_date) else {
            continue;
        };
        let group = groups.entry(bucket.key.clone()).or_insert_with(|| PeriodSummary {
            key: bucket.key,
            label: bucket.label,
            period_start: bucket.start,
            total_revenue: Decimal::ZERO,
            total_expenses: Decimal::ZERO,
            total_profit: Decimal::ZERO,
            profit_margin: Decimal::ZERO,
            event_count: 0,
            expense_count: 0,
        });
        group.total_revenue += row.booked_amount;
        group.total_expenses += row.total_expenses;
        group.total_profit += row.profit;
        group.event_count += 1;
        group.expense_count += row.expense_count;
    }

    groups
        .into_values()
        .map(|mut group| {
            group.profit_margin = profit_margin(group.total_profit, group.total_revenue);
            group
        })
        .collect()
}

/// Expense total for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpenseBucket {
    /// Sortable period key
    pub key: String,
    /// Display label
    pub label: String,
    /// First day of the period
    pub period_start: NaiveDate,
    /// Sum of expenses dated in the period
    pub total_amount: Decimal,
    /// Number of those expenses
    pub expense_count: usize,
}

/// Groups expenses by the period of their own expense date, oldest first.
#[must_use]
pub fn expense_trend(expenses: &[expense::Model], period: Period) -> Vec<ExpenseBucket> {
    let mut groups: BTreeMap<String, ExpenseBucket> = BTreeMap::new();

    for expense in expenses {
        let Some(bucket) = period.bucket(expense.expense_date) else {
            continue;
        };
        let group = groups.entry(bucket.key.clone()).or_insert_with(|| ExpenseBucket {
            key: bucket.key,
            label: bucket.label,
            period_start: bucket.start,
            total_amount: Decimal::ZERO,
            expense_count: 0,
        });
        group.total_amount += expense.amount;
        group.expense_count += 1;
    }

    groups.into_values().collect()
}

/// Expense total for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryShare {
    /// Category name, or "Other"
    pub category: String,
    /// Sum of the category's expenses
    pub amount: Decimal,
    /// Number of expenses
    pub count: usize,
    /// Share of the overall expense total, as a percentage
    pub share_percent: Decimal,
}

/// Groups expenses by category name, largest amount first.
#[must_use]
pub fn category_breakdown(expenses: &[ExpenseDetail]) -> Vec<CategoryShare> {
    let mut groups: HashMap<&str, (Decimal, usize)> = HashMap::new();
    for detail in expenses {
        let name = detail.category_name.as_deref().unwrap_or(UNCATEGORIZED);
        let entry = groups.entry(name).or_default();
        entry.0 += detail.expense.amount;
        entry.1 += 1;
    }

    let total: Decimal = groups.values().map(|(amount, _)| *amount).sum();
    let mut shares: Vec<CategoryShare> = groups
        .into_iter()
        .map(|(name, (amount, count))| CategoryShare {
            category: name.to_string(),
            amount,
            count,
            share_percent: profit_margin(amount, total),
        })
        .collect();
    shares.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.category.cmp(&b.category)));
    shares
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{date, detail, event_model, expense_model};

    fn dec(value: i64) -> Decimal {
        Decimal::from(value)
    }

    #[test]
    fn test_profit_and_margin_example() {
        let events = vec![event_model(1, "2024-05-10", 10_000)];
        let expenses = vec![expense_model(1, 1, "2024-05-01", 4_000), expense_model(2, 1, "2024-05-02", 1_000)];

        let rows = event_profitability(&events, &expenses);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].total_expenses, dec(5_000));
        assert_eq!(rows[0].profit, dec(5_000));
        assert_eq!(rows[0].profit_margin, dec(50));
        assert_eq!(rows[0].expense_count, 2);
    }

    #[test]
    fn test_zero_booked_amount_margin_is_zero() {
        let events = vec![event_model(1, "2024-05-10", 0)];
        let expenses = vec![expense_model(1, 1, "2024-05-01", 100)];

        let rows = event_profitability(&events, &expenses);
        assert_eq!(rows[0].profit, dec(-100));
        assert_eq!(rows[0].profit_margin, Decimal::ZERO);
    }

    #[test]
    fn test_profit_is_exact_for_fractional_amounts() {
        let events = vec![event_model(1, "2024-05-10", 1_000)];
        let mut expenses = Vec::new();
        for id in 0..10 {
            let mut expense = expense_model(id, 1, "2024-05-01", 0);
            expense.amount = Decimal::new(10, 2); // 0.10
            expenses.push(expense);
        }

        let rows = event_profitability(&events, &expenses);
        assert_eq!(rows[0].total_expenses, Decimal::ONE);
        assert_eq!(rows[0].profit, dec(999));
    }

    #[test]
    fn test_expenses_for_unknown_events_are_ignored() {
        let events = vec![event_model(1, "2024-05-10", 500)];
        let expenses = vec![expense_model(1, 1, "2024-05-01", 100), expense_model(2, 42, "2024-05-01", 900)];

        let rows = event_profitability(&events, &expenses);
        assert_eq!(rows[0].total_expenses, dec(100));
        assert_eq!(summarize(&rows).total_expenses, dec(100));
    }

    #[test]
    fn test_event_without_expenses() {
        let events = vec![event_model(7, "2024-05-10", 2_500)];
        let rows = event_profitability(&events, &[]);
        assert_eq!(rows[0].profit, dec(2_500));
        assert_eq!(rows[0].profit_margin, dec(100));
        assert_eq!(rows[0].expense_count, 0);
    }

    #[test]
    fn test_sort_event_profits() {
        let events = vec![
            event_model(1, "2024-01-01", 1_000),
            event_model(2, "2024-03-01", 10_000),
            event_model(3, "2024-02-01", 2_000),
        ];
        let expenses = vec![
            expense_model(1, 1, "2024-01-01", 100),   // profit 900, margin 90
            expense_model(2, 2, "2024-03-01", 5_000), // profit 5000, margin 50
            expense_model(3, 3, "2024-02-01", 1_900), // profit 100, margin 5
        ];
        let mut rows = event_profitability(&events, &expenses);

        sort_event_profits(&mut rows, EventSort::Profit);
        let ids: Vec<i64> = rows.iter().map(|r| r.event_id).collect();
        assert_eq!(ids, vec![2, 1, 3]);

        sort_event_profits(&mut rows, EventSort::Margin);
        let ids: Vec<i64> = rows.iter().map(|r| r.event_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        sort_event_profits(&mut rows, EventSort::Date);
        let ids: Vec<i64> = rows.iter().map(|r| r.event_id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_summarize() {
        let events = vec![
            event_model(1, "2024-01-01", 10_000),
            event_model(2, "2024-02-01", 1_000),
            event_model(3, "2024-03-01", 0),
        ];
        let expenses = vec![
            expense_model(1, 1, "2024-01-01", 4_000),
            expense_model(2, 2, "2024-02-01", 1_500),
        ];
        let summary = summarize(&event_profitability(&events, &expenses));

        assert_eq!(summary.total_revenue, dec(11_000));
        assert_eq!(summary.total_expenses, dec(5_500));
        assert_eq!(summary.total_profit, dec(5_500));
        assert_eq!(summary.profit_margin, dec(50));
        // (60 + -50 + 0) / 3
        assert_eq!(summary.average_margin.round_dp(2), Decimal::new(333, 2));
        assert_eq!(summary.event_count, 3);
        assert_eq!(summary.profitable_events, 1);
        assert_eq!(summary.loss_events, 1);
    }

    #[test]
    fn test_summarize_empty() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_revenue, Decimal::ZERO);
        assert_eq!(summary.profit_margin, Decimal::ZERO);
        assert_eq!(summary.average_margin, Decimal::ZERO);
        assert_eq!(summary.event_count, 0);
    }

    #[test]
    fn test_period_buckets() {
        let d = date("2024-03-05"); // Tuesday

        let bucket = Period::Day.bucket(d).unwrap();
        assert_eq!(bucket.key, "2024-03-05");

        let bucket = Period::Week.bucket(d).unwrap();
        assert_eq!(bucket.key, "2024-W10");
        assert_eq!(bucket.start, date("2024-03-04"));

        let bucket = Period::Month.bucket(d).unwrap();
        assert_eq!(bucket.key, "2024-03");
        assert_eq!(bucket.label, "Mar 2024");
        assert_eq!(bucket.start, date("2024-03-01"));

        let bucket = Period::Quarter.bucket(d).unwrap();
        assert_eq!(bucket.key, "2024-Q1");
        assert_eq!(bucket.label, "Q1 2024");
        assert_eq!(bucket.start, date("2024-01-01"));

        let bucket = Period::Quarter.bucket(date("2024-12-31")).unwrap();
        assert_eq!(bucket.label, "Q4 2024");
        assert_eq!(bucket.start, date("2024-10-01"));

        let bucket = Period::Year.bucket(d).unwrap();
        assert_eq!(bucket.key, "2024");
        assert_eq!(bucket.start, date("2024-01-01"));
    }

    #[test]
    fn test_fiscal_year_starts_in_april() {
        let march = Period::FiscalYear.bucket(date("2024-03-31")).unwrap();
        assert_eq!(march.key, "FY2023");
        assert_eq!(march.label, "FY 2023-24");
        assert_eq!(march.start, date("2023-04-01"));

        let april = Period::FiscalYear.bucket(date("2024-04-01")).unwrap();
        assert_eq!(april.key, "FY2024");
        assert_eq!(april.label, "FY 2024-25");

        let fy_1999 = Period::FiscalYear.bucket(date("1999-12-01")).unwrap();
        assert_eq!(fy_1999.label, "FY 1999-00");
    }

    #[test]
    fn test_iso_week_crosses_year_boundary() {
        // 2024-12-30 is the Monday of ISO week 1 of 2025
        let bucket = Period::Week.bucket(date("2024-12-31")).unwrap();
        assert_eq!(bucket.key, "2025-W01");
        assert_eq!(bucket.start, date("2024-12-30"));
    }

    #[test]
    fn test_custom_range_is_inclusive() {
        let period = Period::Custom {
            start: date("2024-01-10"),
            end: date("2024-01-20"),
        };
        assert!(period.bucket(date("2024-01-10")).is_some());
        assert!(period.bucket(date("2024-01-20")).is_some());
        assert!(period.bucket(date("2024-01-09")).is_none());
        assert!(period.bucket(date("2024-01-21")).is_none());
    }

    #[test]
    fn test_period_from_parts() {
        assert_eq!(Period::from_parts("month", None, None).unwrap(), Period::Month);
        assert_eq!(
            Period::from_parts("fiscal_year", None, None).unwrap(),
            Period::FiscalYear
        );
        assert!(Period::from_parts("fortnight", None, None).is_err());
        assert!(Period::from_parts("custom", Some(date("2024-01-01")), None).is_err());
        assert!(
            Period::from_parts("custom", Some(date("2024-02-01")), Some(date("2024-01-01")))
                .is_err()
        );
        assert_eq!(
            Period::from_parts("custom", Some(date("2024-01-01")), Some(date("2024-02-01")))
                .unwrap(),
            Period::Custom {
                start: date("2024-01-01"),
                end: date("2024-02-01"),
            }
        );
    }

    #[test]
    fn test_aggregate_by_month() {
        let events = vec![
            event_model(1, "2024-01-05", 10_000),
            event_model(2, "2024-01-25", 5_000),
            event_model(3, "2024-02-14", 0),
        ];
        let expenses = vec![
            expense_model(1, 1, "2024-01-01", 4_000),
            expense_model(2, 2, "2024-01-20", 1_000),
            expense_model(3, 3, "2024-02-10", 300),
        ];

        let groups = aggregate_by_period(&events, &expenses, Period::Month);
        assert_eq!(groups.len(), 2);

        assert_eq!(groups[0].label, "Jan 2024");
        assert_eq!(groups[0].total_revenue, dec(15_000));
        assert_eq!(groups[0].total_expenses, dec(5_000));
        assert_eq!(groups[0].total_profit, dec(10_000));
        assert_eq!(groups[0].event_count, 2);
        assert_eq!(groups[0].expense_count, 2);

        assert_eq!(groups[1].label, "Feb 2024");
        assert_eq!(groups[1].total_profit, dec(-300));
        assert_eq!(groups[1].profit_margin, Decimal::ZERO);
    }

    #[test]
    fn test_grouping_partitions_records() {
        // Spread events over three years with a deterministic pattern of amounts
        let mut events = Vec::new();
        let mut expenses = Vec::new();
        let mut expense_id = 0;
        for id in 0..60_i64 {
            let month = u32::try_from(id % 12).unwrap() + 1;
            let day = u32::try_from(id % 28).unwrap() + 1;
            let year = 2022 + i32::try_from(id % 3).unwrap();
            let event_date = NaiveDate::from_ymd_opt(year, month, day).unwrap();
            let mut event = event_model(id, "2024-01-01", (id * 137) % 5_000);
            event.date = event_date;
            events.push(event);
            for n in 0..(id % 4) {
                expense_id += 1;
                let mut expense = expense_model(expense_id, id, "2024-01-01", (id + n) * 11);
                expense.expense_date = event_date;
                expenses.push(expense);
            }
        }

        let overall = summarize(&event_profitability(&events, &expenses));
        for period in [
            Period::Day,
            Period::Week,
            Period::Month,
            Period::Quarter,
            Period::Year,
            Period::FiscalYear,
        ] {
            let groups = aggregate_by_period(&events, &expenses, period);
            let event_count: usize = groups.iter().map(|g| g.event_count).sum();
            let expense_count: usize = groups.iter().map(|g| g.expense_count).sum();
            let revenue: Decimal = groups.iter().map(|g| g.total_revenue).sum();
            let spent: Decimal = groups.iter().map(|g| g.total_expenses).sum();
            let profit: Decimal = groups.iter().map(|g| g.total_profit).sum();

            assert_eq!(event_count, events.len(), "{period:?}");
            assert_eq!(expense_count, expenses.len(), "{period:?}");
            assert_eq!(revenue, overall.total_revenue, "{period:?}");
            assert_eq!(spent, overall.total_expenses, "{period:?}");
            assert_eq!(profit, overall.total_profit, "{period:?}");

            let trend = expense_trend(&expenses, period);
            let trend_total: Decimal = trend.iter().map(|b| b.total_amount).sum();
            assert_eq!(trend_total, overall.total_expenses, "{period:?}");
        }
    }

    #[test]
    fn test_custom_range_drops_outside_events() {
        let events = vec![
            event_model(1, "2024-01-05", 1_000),
            event_model(2, "2024-03-05", 2_000),
        ];
        let period = Period::Custom {
            start: date("2024-01-01"),
            end: date("2024-01-31"),
        };

        let groups = aggregate_by_period(&events, &[], period);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].event_count, 1);
        assert_eq!(groups[0].total_revenue, dec(1_000));
    }

    #[test]
    fn test_expense_trend_uses_expense_date() {
        let expenses = vec![
            expense_model(1, 1, "2024-01-31", 100),
            expense_model(2, 1, "2024-02-01", 50),
            expense_model(3, 2, "2024-02-20", 25),
        ];

        let trend = expense_trend(&expenses, Period::Month);
        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].key, "2024-01");
        assert_eq!(trend[0].total_amount, dec(100));
        assert_eq!(trend[1].key, "2024-02");
        assert_eq!(trend[1].total_amount, dec(75));
        assert_eq!(trend[1].expense_count, 2);
    }

    #[test]
    fn test_category_breakdown() {
        let expenses = vec![
            detail(expense_model(1, 1, "2024-01-01", 300), Some("Food")),
            detail(expense_model(2, 1, "2024-01-01", 100), Some("Staff")),
            detail(expense_model(3, 1, "2024-01-01", 500), Some("Food")),
            detail(expense_model(4, 1, "2024-01-01", 100), None),
        ];

        let shares = category_breakdown(&expenses);
        assert_eq!(shares.len(), 3);
        assert_eq!(shares[0].category, "Food");
        assert_eq!(shares[0].amount, dec(800));
        assert_eq!(shares[0].count, 2);
        assert_eq!(shares[0].share_percent, dec(80));
        // Ties broken by name
        assert_eq!(shares[1].category, UNCATEGORIZED);
        assert_eq!(shares[2].category, "Staff");
        assert_eq!(shares[2].share_percent, dec(10));
    }

    #[test]
    fn test_category_breakdown_all_zero_amounts() {
        let expenses = vec![detail(expense_model(1, 1, "2024-01-01", 0), Some("Food"))];
        let shares = category_breakdown(&expenses);
        assert_eq!(shares[0].share_percent, Decimal::ZERO);
    }
}
