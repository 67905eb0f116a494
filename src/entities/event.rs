//! Event entity - a catering engagement.
//!
//! Each event belongs to one owner (the auth provider's user id), carries the
//! booked revenue used for profit calculations, and owns any number of expenses.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Event database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "events")]
pub struct Model {
    /// Unique identifier for the event
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Event name (e.g., "Sharma Wedding Reception")
    pub name: String,
    /// Day the event takes place
    pub date: Date,
    /// Client the event is catered for
    pub client_name: String,
    /// Venue, if known
    pub location: Option<String>,
    /// Lifecycle status: `"planned"` or `"completed"`
    pub status: String,
    /// Guest count
    pub pax: i32,
    /// Revenue booked for the event
    pub booked_amount: Decimal,
    /// Free-form notes
    pub notes: Option<String>,
    /// Auth provider user id of the owner
    pub created_by: String,
    /// When the event was created
    pub created_at: DateTimeUtc,
    /// When the event was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Event and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One event has many expenses
    #[sea_orm(has_many = "super::expense::Entity")]
    Expenses,
}

impl Related<super::expense::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
