/// Database configuration and connection management
pub mod database;

/// Expense category seed list loaded from config.toml
pub mod categories;

/// Server settings loaded from environment variables
pub mod settings;
