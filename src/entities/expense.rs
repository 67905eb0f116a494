//! Expense entity - a dated cost attached to one event and one category.
//!
//! Receipt fields are filled in once a receipt has been uploaded to the
//! receipt store; the file itself never lives in the database.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Expense database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    /// Unique identifier for the expense
    #[sea_orm(primary_key)]
    pub id: i64,
    /// What the money was spent on
    pub description: String,
    /// Amount spent (never negative)
    pub amount: Decimal,
    /// Day the cost was incurred
    pub expense_date: Date,
    /// Event this expense is charged to
    pub event_id: i64,
    /// Category used for breakdowns
    pub category_id: i64,
    /// Public URL of the uploaded receipt
    pub receipt_url: Option<String>,
    /// Original filename of the uploaded receipt
    pub receipt_file_name: Option<String>,
    /// When the receipt was uploaded
    pub receipt_uploaded_at: Option<DateTimeUtc>,
    /// Auth provider user id of the owner
    pub created_by: String,
    /// When the expense was created
    pub created_at: DateTimeUtc,
    /// When the expense was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Expense and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each expense belongs to one event
    #[sea_orm(
        belongs_to = "super::event::Entity",
        from = "Column::EventId",
        to = "super::event::Column::Id",
        on_delete = "Cascade"
    )]
    Event,
    /// Each expense belongs to one category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
}

impl Related<super::event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
