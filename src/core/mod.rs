//! Core business logic, independent of the HTTP layer.
//!
//! `event`, `expense` and `category` talk to the database; `analytics`,
//! `report` and `export` are pure transformations over fetched rows.

/// Profit aggregation by event, period and category
pub mod analytics;
/// Category lookup list operations
pub mod category;
/// Event operations
pub mod event;
/// Expense operations
pub mod expense;
/// CSV and JSON export
pub mod export;
/// Profit/loss report and dashboard summary
pub mod report;

use crate::errors::{Error, Result};
use rust_decimal::Decimal;

/// Largest accepted money value. Amounts are stored as `REAL` on `SQLite`, so
/// the bound keeps every accepted value within the digits a double holds
/// exactly, and keeps totals far from `Decimal` overflow.
// 9_999_999_999_999.99 (mantissa 999_999_999_999_999, scale 2); `Decimal::new` is not const.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_319, 232_830, 0, false, 2);

/// Decimal places accepted on a money value.
pub const AMOUNT_DECIMAL_PLACES: u32 = 2;

/// Rejects negative amounts, amounts above [`MAX_AMOUNT`] and amounts with
/// more than [`AMOUNT_DECIMAL_PLACES`] decimals.
///
/// # Errors
/// Returns [`Error::InvalidAmount`] carrying the rejected value.
pub fn validate_amount(amount: Decimal) -> Result<()> {
    if amount < Decimal::ZERO
        || amount > MAX_AMOUNT
        || amount.normalize().scale() > AMOUNT_DECIMAL_PLACES
    {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(())
}
