//! Expense business logic - Handles all expense-related operations.
//!
//! Expenses are always charged to an event the owner controls and classified by
//! one of the shared categories. Both references are checked before any write so
//! a bad id surfaces as a clear error instead of a foreign key failure. Receipt
//! metadata is attached separately once the file has been stored.

use crate::{
    core::{event::get_event, validate_amount},
    entities::{Category, Event, Expense, category, event, expense},
    errors::{Error, Result},
    storage::StoredReceipt,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, QuerySelect, Set, prelude::*};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// Fields supplied when creating or editing an expense.
#[derive(Debug, Clone, Deserialize)]
pub struct ExpenseInput {
    /// What the money was spent on
    pub description: String,
    /// Amount spent
    pub amount: Decimal,
    /// Day the cost was incurred
    pub expense_date: NaiveDate,
    /// Event the expense is charged to
    pub event_id: i64,
    /// Category of the expense
    pub category_id: i64,
}

impl ExpenseInput {
    fn validate(&self) -> Result<()> {
        if self.description.trim().is_empty() {
            return Err(Error::validation("Expense description cannot be empty"));
        }
        validate_amount(self.amount)
    }
}

/// An expense joined with the names of its event and category, as shown in
/// expense listings and exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpenseDetail {
    /// The stored expense
    #[serde(flatten)]
    pub expense: expense::Model,
    /// Name of the event, if it still exists
    pub event_name: Option<String>,
    /// Name of the category, if it still exists
    pub category_name: Option<String>,
}

async fn ensure_references<C>(db: &C, owner: &str, input: &ExpenseInput) -> Result<()>
where
    C: ConnectionTrait,
{
    get_event(db, owner, input.event_id).await?;
    Category::find_by_id(input.category_id)
        .one(db)
        .await?
        .ok_or(Error::CategoryNotFound {
            id: input.category_id,
        })?;
    Ok(())
}

/// Retrieves all expenses of an owner, newest expense date first.
pub async fn list_expenses(db: &DatabaseConnection, owner: &str) -> Result<Vec<expense::Model>> {
    Expense::find()
        .filter(expense::Column::CreatedBy.eq(owner))
        .order_by_desc(expense::Column::ExpenseDate)
        .order_by_desc(expense::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the expenses charged to one of the owner's events.
pub async fn list_expenses_for_event(
    db: &DatabaseConnection,
    owner: &str,
    event_id: i64,
) -> Result<Vec<expense::Model>> {
    get_event(db, owner, event_id).await?;

    Expense::find()
        .filter(expense::Column::EventId.eq(event_id))
        .order_by_desc(expense::Column::ExpenseDate)
        .order_by_desc(expense::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the owner's most recently created expenses.
pub async fn recent_expenses(
    db: &DatabaseConnection,
    owner: &str,
    limit: u64,
) -> Result<Vec<expense::Model>> {
    Expense::find()
        .filter(expense::Column::CreatedBy.eq(owner))
        .order_by_desc(expense::Column::CreatedAt)
        .order_by_desc(expense::Column::Id)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Joins expenses with their event and category names.
///
/// Names are looked up in two queries rather than one join per row.
pub async fn attach_names(
    db: &DatabaseConnection,
    expenses: Vec<expense::Model>,
) -> Result<Vec<ExpenseDetail>> {
    let event_ids: Vec<i64> = expenses.iter().map(|e| e.event_id).collect();
    let category_ids: Vec<i64> = expenses.iter().map(|e| e.category_id).collect();

    let event_names: HashMap<i64, String> = Event::find()
        .filter(event::Column::Id.is_in(event_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|e| (e.id, e.name))
        .collect();
    let category_names: HashMap<i64, String> = Category::find()
        .filter(category::Column::Id.is_in(category_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();

    Ok(expenses
        .into_iter()
        .map(|expense| ExpenseDetail {
            event_name: event_names.get(&expense.event_id).cloned(),
            category_name: category_names.get(&expense.category_id).cloned(),
            expense,
        })
        .collect())
}

/// Finds an expense by id, returning None if it does not exist or is not the owner's.
pub async fn find_expense(
    db: &DatabaseConnection,
    owner: &str,
    expense_id: i64,
) -> Result<Option<expense::Model>> {
    Expense::find_by_id(expense_id)
        .filter(expense::Column::CreatedBy.eq(owner))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Like [`find_expense`] but a missing expense is an error.
pub async fn get_expense(
    db: &DatabaseConnection,
    owner: &str,
    expense_id: i64,
) -> Result<expense::Model> {
    find_expense(db, owner, expense_id)
        .await?
        .ok_or(Error::ExpenseNotFound { id: expense_id })
}

/// Creates a new expense, optionally with receipt metadata from an earlier upload.
#[instrument(skip(db, input, receipt), fields(event_id = input.event_id))]
pub async fn create_expense(
    db: &DatabaseConnection,
    owner: &str,
    input: ExpenseInput,
    receipt: Option<StoredReceipt>,
) -> Result<expense::Model> {
    input.validate()?;
    ensure_references(db, owner, &input).await?;

    let now = Utc::now();
    let uploaded_at = receipt.as_ref().map(|_| now);
    let (receipt_url, receipt_file_name) = receipt
        .map(|r| (Some(r.url), Some(r.filename)))
        .unwrap_or_default();

    let model = expense::ActiveModel {
        description: Set(input.description.trim().to_string()),
        amount: Set(input.amount),
        expense_date: Set(input.expense_date),
        event_id: Set(input.event_id),
        category_id: Set(input.category_id),
        receipt_url: Set(receipt_url),
        receipt_file_name: Set(receipt_file_name),
        receipt_uploaded_at: Set(uploaded_at),
        created_by: Set(owner.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let created = model.insert(db).await?;
    info!(expense_id = created.id, amount = %created.amount, "Created expense");
    Ok(created)
}

/// Replaces the editable fields of an existing expense. Receipt fields are kept.
#[instrument(skip(db, input))]
pub async fn update_expense(
    db: &DatabaseConnection,
    owner: &str,
    expense_id: i64,
    input: ExpenseInput,
) -> Result<expense::Model> {
    input.validate()?;
    let existing = get_expense(db, owner, expense_id).await?;
    ensure_references(db, owner, &input).await?;

    let mut model: expense::ActiveModel = existing.into();
    model.description = Set(input.description.trim().to_string());
    model.amount = Set(input.amount);
    model.expense_date = Set(input.expense_date);
    model.event_id = Set(input.event_id);
    model.category_id = Set(input.category_id);
    model.updated_at = Set(Utc::now());

    let updated = model.update(db).await?;
    debug!(expense_id, "Updated expense");
    Ok(updated)
}

/// Creates the expense when `expense_id` is None, otherwise updates it.
pub async fn upsert_expense(
    db: &DatabaseConnection,
    owner: &str,
    expense_id: Option<i64>,
    input: ExpenseInput,
) -> Result<expense::Model> {
    match expense_id {
        Some(id) => update_expense(db, owner, id, input).await,
        None => create_expense(db, owner, input, None).await,
    }
}

/// Records a stored receipt against an existing expense.
#[instrument(skip(db, receipt))]
pub async fn attach_receipt(
    db: &DatabaseConnection,
    owner: &str,
    expense_id: i64,
    receipt: StoredReceipt,
) -> Result<expense::Model> {
    let existing = get_expense(db, owner, expense_id).await?;

    let now = Utc::now();
    let mut model: expense::ActiveModel = existing.into();
    model.receipt_url = Set(Some(receipt.url));
    model.receipt_file_name = Set(Some(receipt.filename));
    model.receipt_uploaded_at = Set(Some(now));
    model.updated_at = Set(now);

    let updated = model.update(db).await?;
    info!(expense_id, "Attached receipt to expense");
    Ok(updated)
}

/// Deletes one of the owner's expenses.
#[instrument(skip(db))]
pub async fn delete_expense(db: &DatabaseConnection, owner: &str, expense_id: i64) -> Result<()> {
    let existing = get_expense(db, owner, expense_id).await?;
    existing.delete(db).await?;
    info!(expense_id, "Deleted expense");
    Ok(())
}
