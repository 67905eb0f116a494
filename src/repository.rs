//! Data-access interface used by the HTTP layer.
//!
//! [`LedgerRepository`] gathers every read and write a handler needs behind one
//! object-safe trait, so handlers never build queries themselves. All
//! operations except the category ones are scoped to an owner id.

use crate::{
    core::{
        category,
        event::{self, EventInput},
        expense::{self, ExpenseDetail, ExpenseInput},
    },
    entities::{category as category_entity, event as event_entity, expense as expense_entity},
    errors::Result,
    storage::{self, ReceiptPolicy, ReceiptStore, ReceiptUpload, StoredReceipt},
};
use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Every data operation the API performs.
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    /// The owner's events, newest first.
    async fn list_events(&self, owner: &str) -> Result<Vec<event_entity::Model>>;

    /// One of the owner's events.
    async fn get_event(&self, owner: &str, event_id: i64) -> Result<event_entity::Model>;

    /// Creates an event, or updates it when `event_id` is given.
    async fn upsert_event(
        &self,
        owner: &str,
        event_id: Option<i64>,
        input: EventInput,
    ) -> Result<event_entity::Model>;

    /// Deletes an event and its expenses.
    async fn delete_event(&self, owner: &str, event_id: i64) -> Result<()>;

    /// The owner's expenses, newest expense date first.
    async fn list_expenses(&self, owner: &str) -> Result<Vec<expense_entity::Model>>;

    /// The owner's expenses with event and category names, optionally limited
    /// to one event.
    async fn list_expense_details(
        &self,
        owner: &str,
        event_id: Option<i64>,
    ) -> Result<Vec<ExpenseDetail>>;

    /// The owner's most recently recorded expenses, with names.
    async fn recent_expenses(&self, owner: &str, limit: u64) -> Result<Vec<ExpenseDetail>>;

    /// Creates an expense, or updates it when `expense_id` is given.
    async fn upsert_expense(
        &self,
        owner: &str,
        expense_id: Option<i64>,
        input: ExpenseInput,
    ) -> Result<expense_entity::Model>;

    /// One of the owner's expenses.
    async fn get_expense(&self, owner: &str, expense_id: i64) -> Result<expense_entity::Model>;

    /// Deletes one expense.
    async fn delete_expense(&self, owner: &str, expense_id: i64) -> Result<()>;

    /// Stores a receipt file and returns where it can be fetched.
    async fn upload_receipt(&self, upload: ReceiptUpload) -> Result<StoredReceipt>;

    /// Records a stored receipt on an expense.
    async fn attach_receipt(
        &self,
        owner: &str,
        expense_id: i64,
        receipt: StoredReceipt,
    ) -> Result<expense_entity::Model>;

    /// All categories, by name.
    async fn list_categories(&self) -> Result<Vec<category_entity::Model>>;

    /// Adds a category.
    async fn create_category(&self, name: &str) -> Result<category_entity::Model>;
}

/// [`LedgerRepository`] over a `SeaORM` connection and a receipt store.
pub struct SeaOrmLedger {
    db: DatabaseConnection,
    store: Arc<dyn ReceiptStore>,
    policy: ReceiptPolicy,
}

impl SeaOrmLedger {
    /// Wraps a connection and a receipt store.
    pub fn new(db: DatabaseConnection, store: Arc<dyn ReceiptStore>, policy: ReceiptPolicy) -> Self {
        Self { db, store, policy }
    }
}

#[async_trait]
impl LedgerRepository for SeaOrmLedger {
    async fn list_events(&self, owner: &str) -> Result<Vec<event_entity::Model>> {
        event::list_events(&self.db, owner).await
    }

    async fn get_event(&self, owner: &str, event_id: i64) -> Result<event_entity::Model> {
        event::get_event(&self.db, owner, event_id).await
    }

    async fn upsert_event(
        &self,
        owner: &str,
        event_id: Option<i64>,
        input: EventInput,
    ) -> Result<event_entity::Model> {
        event::upsert_event(&self.db, owner, event_id, input).await
    }

    async fn delete_event(&self, owner: &str, event_id: i64) -> Result<()> {
        event::delete_event(&self.db, owner, event_id).await
    }

    async fn list_expenses(&self, owner: &str) -> Result<Vec<expense_entity::Model>> {
        expense::list_expenses(&self.db, owner).await
    }

    async fn list_expense_details(
        &self,
        owner: &str,
        event_id: Option<i64>,
    ) -> Result<Vec<ExpenseDetail>> {
        let expenses = match event_id {
            Some(id) => expense::list_expenses_for_event(&self.db, owner, id).await?,
            None => expense::list_expenses(&self.db, owner).await?,
        };
        expense::attach_names(&self.db, expenses).await
    }

    async fn recent_expenses(&self, owner: &str, limit: u64) -> Result<Vec<ExpenseDetail>> {
        let expenses = expense::recent_expenses(&self.db, owner, limit).await?;
        expense::attach_names(&self.db, expenses).await
    }

    async fn upsert_expense(
        &self,
        owner: &str,
        expense_id: Option<i64>,
        input: ExpenseInput,
    ) -> Result<expense_entity::Model> {
        expense::upsert_expense(&self.db, owner, expense_id, input).await
    }

    async fn get_expense(&self, owner: &str, expense_id: i64) -> Result<expense_entity::Model> {
        expense::get_expense(&self.db, owner, expense_id).await
    }

    async fn delete_expense(&self, owner: &str, expense_id: i64) -> Result<()> {
        expense::delete_expense(&self.db, owner, expense_id).await
    }

    async fn upload_receipt(&self, upload: ReceiptUpload) -> Result<StoredReceipt> {
        storage::store_receipt(self.store.as_ref(), self.policy, upload).await
    }

    async fn attach_receipt(
        &self,
        owner: &str,
        expense_id: i64,
        receipt: StoredReceipt,
    ) -> Result<expense_entity::Model> {
        expense::attach_receipt(&self.db, owner, expense_id, receipt).await
    }

    async fn list_categories(&self) -> Result<Vec<category_entity::Model>> {
        category::list_categories(&self.db).await
    }

    async fn create_category(&self, name: &str) -> Result<category_entity::Model> {
        category::create_category(&self.db, name).await
    }
}
