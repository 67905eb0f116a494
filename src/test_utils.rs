//! Shared test utilities for the ledger.
//!
//! This module provides helpers for setting up test databases, creating
//! records with sensible defaults, and building in-memory models for the pure
//! analytics tests.
#![allow(clippy::unwrap_used)]

use crate::{
    core::{
        category,
        event::{self, EventInput, EventStatus},
        expense::{self, ExpenseDetail, ExpenseInput},
    },
    entities,
    errors::Result,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;

/// Owner used by most tests.
pub const TEST_OWNER: &str = "test_user";

/// A second owner, for isolation tests.
pub const OTHER_OWNER: &str = "other_user";

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Parses a `YYYY-MM-DD` literal.
pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

/// Event input with sensible defaults.
///
/// # Defaults
/// * `date`: 2024-05-10
/// * `client_name`: "Test Client"
/// * `status`: planned
/// * `pax`: 50
pub fn event_input(name: &str, booked_amount: i64) -> EventInput {
    EventInput {
        name: name.to_string(),
        date: date("2024-05-10"),
        client_name: "Test Client".to_string(),
        location: None,
        status: EventStatus::Planned,
        pax: 50,
        booked_amount: Decimal::from(booked_amount),
        notes: None,
    }
}

/// Creates a test event owned by [`TEST_OWNER`].
pub async fn create_test_event(
    db: &DatabaseConnection,
    name: &str,
    booked_amount: i64,
) -> Result<entities::event::Model> {
    event::create_event(db, TEST_OWNER, event_input(name, booked_amount)).await
}

/// Creates a test event with a custom owner and date.
pub async fn create_dated_event(
    db: &DatabaseConnection,
    owner: &str,
    name: &str,
    on: &str,
    booked_amount: i64,
) -> Result<entities::event::Model> {
    let mut input = event_input(name, booked_amount);
    input.date = date(on);
    event::create_event(db, owner, input).await
}

/// Creates a category.
pub async fn create_test_category(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::category::Model> {
    category::create_category(db, name).await
}

/// Expense input with sensible defaults.
///
/// # Defaults
/// * `description`: "Test expense"
/// * `expense_date`: 2024-05-01
pub fn expense_input(event_id: i64, category_id: i64, amount: i64) -> ExpenseInput {
    ExpenseInput {
        description: "Test expense".to_string(),
        amount: Decimal::from(amount),
        expense_date: date("2024-05-01"),
        event_id,
        category_id,
    }
}

/// Creates a test expense owned by [`TEST_OWNER`].
pub async fn create_test_expense(
    db: &DatabaseConnection,
    event_id: i64,
    category_id: i64,
    amount: i64,
) -> Result<entities::expense::Model> {
    expense::create_expense(
        db,
        TEST_OWNER,
        expense_input(event_id, category_id, amount),
        None,
    )
    .await
}

/// Sets up a database with one event and a "Food" category.
/// Returns (db, event, category) for expense-related tests.
pub async fn setup_with_event() -> Result<(
    DatabaseConnection,
    entities::event::Model,
    entities::category::Model,
)> {
    let db = setup_test_db().await?;
    let category = create_test_category(&db, "Food").await?;
    let event = create_test_event(&db, "Test Event", 10_000).await?;
    Ok((db, event, category))
}

/// In-memory event model, never persisted.
pub fn event_model(id: i64, on: &str, booked_amount: i64) -> entities::event::Model {
    let now = Utc::now();
    entities::event::Model {
        id,
        name: format!("Event {id}"),
        date: date(on),
        client_name: "Test Client".to_string(),
        location: None,
        status: EventStatus::Planned.as_str().to_string(),
        pax: 10,
        booked_amount: Decimal::from(booked_amount),
        notes: None,
        created_by: TEST_OWNER.to_string(),
        created_at: now,
        updated_at: now,
    }
}

/// In-memory expense model, never persisted.
pub fn expense_model(id: i64, event_id: i64, on: &str, amount: i64) -> entities::expense::Model {
    let now = Utc::now();
    entities::expense::Model {
        id,
        description: format!("Expense {id}"),
        amount: Decimal::from(amount),
        expense_date: date(on),
        event_id,
        category_id: 1,
        receipt_url: None,
        receipt_file_name: None,
        receipt_uploaded_at: None,
        created_by: TEST_OWNER.to_string(),
        created_at: now,
        updated_at: now,
    }
}

/// Wraps an expense model with a category name.
pub fn detail(expense: entities::expense::Model, category: Option<&str>) -> ExpenseDetail {
    ExpenseDetail {
        event_name: None,
        category_name: category.map(str::to_string),
        expense,
    }
}
