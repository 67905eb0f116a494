//! Database configuration module for the catering ledger.
//!
//! This module handles the relational store connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust structs without hand-written SQL.

use crate::entities::{Category, Event, Expense};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::{debug, info};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/catering_ledger.sqlite?mode=rwc";

/// Gets the database URL from environment variable or returns default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by `DATABASE_URL`.
///
/// Falls back to a local `SQLite` file if no environment variable is set.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    debug!("Connecting to database at {database_url}");

    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates the `expense_categories`, `events` and `expenses` tables if they are missing.
///
/// Categories and events are created before expenses so the foreign keys resolve.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut category_table = schema.create_table_from_entity(Category);
    let mut event_table = schema.create_table_from_entity(Event);
    let mut expense_table = schema.create_table_from_entity(Expense);
    category_table.if_not_exists();
    event_table.if_not_exists();
    expense_table.if_not_exists();

    db.execute(builder.build(&category_table)).await?;
    db.execute(builder.build(&event_table)).await?;
    db.execute(builder.build(&expense_table)).await?;

    info!("Database tables ensured.");
    Ok(())
}
