//! Event business logic - Handles all event-related operations.
//!
//! Provides functions for creating, retrieving, updating and deleting events.
//! Every lookup is scoped by owner: an event that belongs to someone else is
//! reported exactly like one that does not exist.

use crate::{
    core::validate_amount,
    entities::{Event, Expense, event, expense},
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use tracing::{debug, info, instrument};

/// Lifecycle status of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    /// Booked but not yet held
    #[default]
    Planned,
    /// Already held
    Completed,
}

impl EventStatus {
    /// Value stored in the `status` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "planned" => Ok(Self::Planned),
            "completed" => Ok(Self::Completed),
            other => Err(Error::validation(format!("Unknown event status: {other}"))),
        }
    }
}

/// Fields supplied when creating or editing an event.
#[derive(Debug, Clone, Deserialize)]
pub struct EventInput {
    /// Event name
    pub name: String,
    /// Day of the event
    pub date: NaiveDate,
    /// Client name
    pub client_name: String,
    /// Venue
    #[serde(default)]
    pub location: Option<String>,
    /// Lifecycle status, planned when omitted
    #[serde(default)]
    pub status: EventStatus,
    /// Guest count
    #[serde(default)]
    pub pax: i32,
    /// Booked revenue
    #[serde(default)]
    pub booked_amount: Decimal,
    /// Free-form notes
    #[serde(default)]
    pub notes: Option<String>,
}

impl EventInput {
    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::validation("Event name cannot be empty"));
        }
        if self.client_name.trim().is_empty() {
            return Err(Error::validation("Client name cannot be empty"));
        }
        if self.pax < 0 {
            return Err(Error::validation("Guest count cannot be negative"));
        }
        validate_amount(self.booked_amount)
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Retrieves all events of an owner, newest event date first.
pub async fn list_events(db: &DatabaseConnection, owner: &str) -> Result<Vec<event::Model>> {
    Event::find()
        .filter(event::Column::CreatedBy.eq(owner))
        .order_by_desc(event::Column::Date)
        .order_by_desc(event::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds an event by id, returning None if it does not exist or is not the owner's.
pub async fn find_event<C>(db: &C, owner: &str, event_id: i64) -> Result<Option<event::Model>>
where
    C: ConnectionTrait,
{
    Event::find_by_id(event_id)
        .filter(event::Column::CreatedBy.eq(owner))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Like [`find_event`] but a missing event is an error.
pub async fn get_event<C>(db: &C, owner: &str, event_id: i64) -> Result<event::Model>
where
    C: ConnectionTrait,
{
    find_event(db, owner, event_id)
        .await?
        .ok_or(Error::EventNotFound { id: event_id })
}

/// Creates a new event for the owner after validating the input.
#[instrument(skip(db, input), fields(name = %input.name))]
pub async fn create_event(
    db: &DatabaseConnection,
    owner: &str,
    input: EventInput,
) -> Result<event::Model> {
    input.validate()?;

    let now = Utc::now();
    let model = event::ActiveModel {
        name: Set(input.name.trim().to_string()),
        date: Set(input.date),
        client_name: Set(input.client_name.trim().to_string()),
        location: Set(blank_to_none(input.location)),
        status: Set(input.status.as_str().to_string()),
        pax: Set(input.pax),
        booked_amount: Set(input.booked_amount),
        notes: Set(blank_to_none(input.notes)),
        created_by: Set(owner.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let created = model.insert(db).await?;
    info!(event_id = created.id, "Created event");
    Ok(created)
}

/// Replaces the editable fields of an existing event.
#[instrument(skip(db, input))]
pub async fn update_event(
    db: &DatabaseConnection,
    owner: &str,
    event_id: i64,
    input: EventInput,
) -> Result<event::Model> {
    input.validate()?;

    let existing = get_event(db, owner, event_id).await?;
    let mut model: event::ActiveModel = existing.into();
    model.name = Set(input.name.trim().to_string());
    model.date = Set(input.date);
    model.client_name = Set(input.client_name.trim().to_string());
    model.location = Set(blank_to_none(input.location));
    model.status = Set(input.status.as_str().to_string());
    model.pax = Set(input.pax);
    model.booked_amount = Set(input.booked_amount);
    model.notes = Set(blank_to_none(input.notes));
    model.updated_at = Set(Utc::now());

    let updated = model.update(db).await?;
    debug!(event_id, "Updated event");
    Ok(updated)
}

/// Creates the event when `event_id` is None, otherwise updates it.
pub async fn upsert_event(
    db: &DatabaseConnection,
    owner: &str,
    event_id: Option<i64>,
    input: EventInput,
) -> Result<event::Model> {
    match event_id {
        Some(id) => update_event(db, owner, id, input).await,
        None => create_event(db, owner, input).await,
    }
}

/// Deletes an event together with all of its expenses.
///
/// Both deletes run in one database transaction so an event never disappears
/// while leaving orphaned expenses behind.
#[instrument(skip(db))]
pub async fn delete_event(db: &DatabaseConnection, owner: &str, event_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let existing = get_event(&txn, owner, event_id).await?;

    let removed = Expense::delete_many()
        .filter(expense::Column::EventId.eq(existing.id))
        .exec(&txn)
        .await?;
    existing.delete(&txn).await?;

    txn.commit().await?;
    info!(
        event_id,
        expenses_removed = removed.rows_affected,
        "Deleted event"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        core::{
            MAX_AMOUNT,
            analytics::{event_profitability, summarize},
        },
        test_utils::*,
    };
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[test]
    fn test_event_status_round_trip() {
        assert_eq!("planned".parse::<EventStatus>().unwrap(), EventStatus::Planned);
        assert_eq!(
            "completed".parse::<EventStatus>().unwrap(),
            EventStatus::Completed
        );
        assert!("cancelled".parse::<EventStatus>().is_err());
        assert_eq!(EventStatus::Completed.to_string(), "completed");
    }

    #[tokio::test]
    async fn test_create_event_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let mut input = event_input("Wedding", 10_000);
        input.name = "   ".to_string();
        let result = create_event(&db, TEST_OWNER, input).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        let mut input = event_input("Wedding", 10_000);
        input.pax = -1;
        let result = create_event(&db, TEST_OWNER, input).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        let input = event_input("Wedding", -5);
        let result = create_event(&db, TEST_OWNER, input).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { .. }));

        let mut input = event_input("Wedding", 0);
        input.booked_amount =
            Decimal::from_i128_with_scale(60_000_000_000_000_000_000_000_000_000, 0);
        let result = create_event(&db, TEST_OWNER, input).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { .. }));

        let mut input = event_input("Wedding", 0);
        input.booked_amount = Decimal::new(10_005, 3);
        let result = create_event(&db, TEST_OWNER, input).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_largest_amount_round_trips_and_sums() -> Result<()> {
        let db = setup_test_db().await?;

        for name in ["First", "Second"] {
            let mut input = event_input(name, 0);
            input.booked_amount = MAX_AMOUNT;
            create_event(&db, TEST_OWNER, input).await?;
        }
        let mut input = event_input("Cents", 0);
        input.booked_amount = Decimal::new(1_234_567_89, 2);
        create_event(&db, TEST_OWNER, input).await?;

        let events = list_events(&db, TEST_OWNER).await?;
        assert_eq!(events.len(), 3);
        let amounts: Vec<Decimal> = events.iter().map(|e| e.booked_amount).collect();
        assert_eq!(amounts.iter().filter(|a| **a == MAX_AMOUNT).count(), 2);
        assert!(amounts.contains(&Decimal::new(1_234_567_89, 2)));

        let summary = summarize(&event_profitability(&events, &[]));
        assert_eq!(
            summary.total_revenue,
            MAX_AMOUNT + MAX_AMOUNT + Decimal::new(1_234_567_89, 2)
        );
        assert_eq!(summary.total_profit, summary.total_revenue);

        Ok(())
    }

    #[tokio::test]
    async fn test_create_event_integration() -> Result<()> {
        let db = setup_test_db().await?;

        let mut input = event_input("  Corporate Lunch ", 25_000);
        input.location = Some("   ".to_string());
        input.pax = 120;
        let created = create_event(&db, TEST_OWNER, input).await?;

        assert_eq!(created.name, "Corporate Lunch");
        assert_eq!(created.booked_amount, Decimal::from(25_000));
        assert_eq!(created.pax, 120);
        assert_eq!(created.status, "planned");
        assert_eq!(created.location, None);
        assert_eq!(created.created_by, TEST_OWNER);

        Ok(())
    }

    #[tokio::test]
    async fn test_list_events_scoped_to_owner_newest_first() -> Result<()> {
        let db = setup_test_db().await?;

        let older = create_dated_event(&db, TEST_OWNER, "Older", "2024-01-10", 100).await?;
        let newer = create_dated_event(&db, TEST_OWNER, "Newer", "2024-06-01", 100).await?;
        create_dated_event(&db, OTHER_OWNER, "Not mine", "2024-03-01", 100).await?;

        let events = list_events(&db, TEST_OWNER).await?;
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].id, newer.id);
        assert_eq!(events[1].id, older.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_event_other_owner_not_found() -> Result<()> {
        let db = setup_test_db().await?;
        let created = create_test_event(&db, "Birthday", 5_000).await?;

        let result = update_event(&db, OTHER_OWNER, created.id, event_input("Hijack", 1)).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::EventNotFound { id } if id == created.id
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_upsert_event_updates_existing() -> Result<()> {
        let db = setup_test_db().await?;
        let created = create_test_event(&db, "Birthday", 5_000).await?;

        let mut input = event_input("Birthday Party", 6_500);
        input.status = EventStatus::Completed;
        let updated = upsert_event(&db, TEST_OWNER, Some(created.id), input).await?;

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Birthday Party");
        assert_eq!(updated.booked_amount, Decimal::from(6_500));
        assert_eq!(updated.status, "completed");
        assert_eq!(list_events(&db, TEST_OWNER).await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_event_removes_expenses() -> Result<()> {
        let db = setup_test_db().await?;
        let category = create_test_category(&db, "Food").await?;
        let doomed = create_test_event(&db, "Doomed", 1_000).await?;
        let kept = create_test_event(&db, "Kept", 1_000).await?;
        create_test_expense(&db, doomed.id, category.id, 100).await?;
        create_test_expense(&db, doomed.id, category.id, 200).await?;
        create_test_expense(&db, kept.id, category.id, 300).await?;

        delete_event(&db, TEST_OWNER, doomed.id).await?;

        assert!(find_event(&db, TEST_OWNER, doomed.id).await?.is_none());
        let remaining = Expense::find().all(&db).await?;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].event_id, kept.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_event_other_owner_not_found() -> Result<()> {
        let db = setup_test_db().await?;
        let created = create_test_event(&db, "Mine", 1_000).await?;

        let result = delete_event(&db, OTHER_OWNER, created.id).await;
        assert!(matches!(result.unwrap_err(), Error::EventNotFound { .. }));
        assert!(find_event(&db, TEST_OWNER, created.id).await?.is_some());

        Ok(())
    }
}
