//! CSV and JSON export of expenses and reports.
//!
//! The CSV dialect is deliberately small: a value is wrapped in double quotes
//! only when it contains a comma, and nothing else is escaped.

use crate::{
    core::{expense::ExpenseDetail, report::ProfitLossReport, report::format_two_decimals},
    errors::{Error, Result},
};
use chrono::NaiveDate;

/// Column headers of the expense export.
pub const EXPENSE_CSV_HEADERS: [&str; 4] = ["Description", "Category", "Amount", "Date"];

fn csv_field(value: &str) -> String {
    if value.contains(',') {
        format!("\"{value}\"")
    } else {
        value.to_string()
    }
}

/// Renders a header line and rows as CSV text.
///
/// # Errors
/// Returns [`Error::EmptyExport`] when there are no rows.
pub fn to_csv(headers: &[&str], rows: &[Vec<String>]) -> Result<String> {
    if rows.is_empty() {
        return Err(Error::EmptyExport);
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(headers.join(","));
    for row in rows {
        let fields: Vec<String> = row.iter().map(|v| csv_field(v)).collect();
        lines.push(fields.join(","));
    }
    Ok(lines.join("\n"))
}

/// Maps expenses to rows matching [`EXPENSE_CSV_HEADERS`].
#[must_use]
pub fn expense_rows(expenses: &[ExpenseDetail]) -> Vec<Vec<String>> {
    expenses
        .iter()
        .map(|detail| {
            vec![
                detail.expense.description.clone(),
                detail.category_name.clone().unwrap_or_default(),
                format_two_decimals(detail.expense.amount),
                detail.expense.expense_date.format("%Y-%m-%d").to_string(),
            ]
        })
        .collect()
}

/// Renders expenses as CSV.
///
/// # Errors
/// Returns [`Error::EmptyExport`] when `expenses` is empty.
pub fn expenses_to_csv(expenses: &[ExpenseDetail]) -> Result<String> {
    to_csv(&EXPENSE_CSV_HEADERS, &expense_rows(expenses))
}

/// Splits CSV text produced by [`to_csv`] back into lines of fields,
/// header line included.
#[must_use]
pub fn parse_csv(text: &str) -> Vec<Vec<String>> {
    text.lines()
        .filter(|line| !line.is_empty())
        .map(parse_line)
        .collect()
}

fn parse_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut quoted = false;

    for ch in line.chars() {
        match ch {
            '"' => quoted = !quoted,
            ',' if !quoted => fields.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields
}

/// Pretty-prints a profit/loss report as JSON.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn report_to_json(report: &ProfitLossReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Keeps file names header-safe: anything but ASCII letters, digits, space,
/// `-`, `_` and `.` becomes `_`.
fn sanitize_file_stem(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "export".to_string()
    } else {
        cleaned
    }
}

/// Download name of a CSV export: `{base}-{YYYY-MM-DD}.csv`.
#[must_use]
pub fn csv_filename(base: &str, on: NaiveDate) -> String {
    format!("{}-{}.csv", sanitize_file_stem(base), on.format("%Y-%m-%d"))
}

/// Download name of a JSON report: `{event}-report-{YYYY-MM-DD}.json`.
#[must_use]
pub fn report_filename(event_name: &str, on: NaiveDate) -> String {
    format!(
        "{}-report-{}.json",
        sanitize_file_stem(event_name),
        on.format("%Y-%m-%d")
    )
}
