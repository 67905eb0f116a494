//! Category business logic.
//!
//! Categories are a flat, shared lookup list. They are seeded from config on
//! startup and can be extended at runtime; names are unique.

use crate::{
    entities::{Category, category},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{debug, info, instrument};

/// Retrieves every category, ordered alphabetically by name.
pub async fn list_categories(db: &DatabaseConnection) -> Result<Vec<category::Model>> {
    Category::find()
        .order_by_asc(category::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a category by its exact name.
pub async fn get_category_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<category::Model>> {
    Category::find()
        .filter(category::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a category, rejecting empty and duplicate names.
#[instrument(skip(db))]
pub async fn create_category(db: &DatabaseConnection, name: &str) -> Result<category::Model> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::validation("Category name cannot be empty"));
    }
    if get_category_by_name(db, name).await?.is_some() {
        return Err(Error::validation(format!(
            "Category '{name}' already exists"
        )));
    }

    let created = category::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await?;
    info!(category_id = created.id, "Created category");
    Ok(created)
}

/// Inserts every configured category that does not exist yet.
///
/// Returns the number of categories inserted; running it twice inserts nothing
/// the second time.
#[instrument(skip(db, names))]
pub async fn seed_categories(db: &DatabaseConnection, names: &[String]) -> Result<usize> {
    let mut inserted = 0;
    for name in names {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        if get_category_by_name(db, name).await?.is_some() {
            debug!("Category '{name}' already exists. Skipping.");
            continue;
        }
        category::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        }
        .insert(db)
        .await?;
        inserted += 1;
    }
    info!("Seeded {inserted} new expense categories.");
    Ok(inserted)
}
