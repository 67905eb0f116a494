//! Unified error type for the ledger.
//!
//! Every fallible operation in the crate returns [`Result`]. Lower level errors
//! from the database, filesystem, serializers and the auth provider convert into
//! [`Error`] through `From`, and each variant knows which HTTP status it maps to
//! so handlers can simply use `?`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde_json::json;
use thiserror::Error;

/// All errors the ledger can produce.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or is invalid
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Input failed validation before reaching the database
    #[error("{message}")]
    Validation {
        /// Human-readable reason
        message: String,
    },

    /// A monetary amount was negative, too large or too precise
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: Decimal,
    },

    /// Event does not exist or belongs to another owner
    #[error("Event not found: {id}")]
    EventNotFound {
        /// Requested event id
        id: i64,
    },

    /// Expense does not exist or belongs to another owner
    #[error("Expense not found: {id}")]
    ExpenseNotFound {
        /// Requested expense id
        id: i64,
    },

    /// Category does not exist
    #[error("Category not found: {id}")]
    CategoryNotFound {
        /// Requested category id
        id: i64,
    },

    /// Missing or rejected credentials
    #[error("{message}")]
    Unauthorized {
        /// Reason shown to the caller
        message: String,
    },

    /// Receipt rejected by the upload policy
    #[error("{message}")]
    UploadRejected {
        /// Reason shown to the caller
        message: String,
    },

    /// Receipt store failed to persist the file
    #[error("Failed to upload receipt. Please try again.")]
    Storage {
        /// Underlying failure, logged but not shown to the caller
        source: std::io::Error,
    },

    /// Nothing to export
    #[error("No data to export")]
    EmptyExport,

    /// Auth provider answered with something we could not understand
    #[error("Auth provider error: {message}")]
    AuthProvider {
        /// Description of the unexpected response
        message: String,
    },

    /// Database error from `SeaORM`
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client error while talking to the auth provider
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Environment variable error
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

impl Error {
    /// Shorthand for a [`Error::Validation`] error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// HTTP status this error is reported with.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. }
            | Self::InvalidAmount { .. }
            | Self::UploadRejected { .. }
            | Self::EmptyExport
            | Self::CategoryNotFound { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::EventNotFound { .. } | Self::ExpenseNotFound { .. } => StatusCode::NOT_FOUND,
            Self::AuthProvider { .. } | Self::Http(_) => StatusCode::BAD_GATEWAY,
            Self::Config { .. }
            | Self::Storage { .. }
            | Self::Database(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::EnvVar(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
