//! Expense category configuration loading from config.toml
//!
//! The categories listed in config.toml are used to seed the shared
//! `expense_categories` table on startup. When no config file is present the
//! built-in list is used instead.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Categories seeded when config.toml does not exist.
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Food",
    "Staff",
    "Decor",
    "Transport",
    "Equipment",
    "Venue",
    "Miscellaneous",
];

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
pub struct Config {
    /// List of categories to seed
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,
}

/// Configuration for a single expense category
#[derive(Debug, Deserialize, Clone)]
pub struct CategoryConfig {
    /// Display name of the category
    pub name: String,
}

impl Config {
    /// Category names in file order.
    #[must_use]
    pub fn category_names(&self) -> Vec<String> {
        self.categories.iter().map(|c| c.name.clone()).collect()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            categories: DEFAULT_CATEGORIES
                .iter()
                .map(|name| CategoryConfig {
                    name: (*name).to_string(),
                })
                .collect(),
        }
    }
}

/// Loads category configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads category configuration from ./config.toml, or the built-in defaults
/// if that file does not exist.
pub fn load_default_config() -> Result<Config> {
    let path = Path::new("config.toml");
    if !path.exists() {
        tracing::warn!("config.toml not found, using built-in expense categories");
        return Ok(Config::default());
    }
    load_config(path)
}
