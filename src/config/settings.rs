//! Server settings loaded from environment variables.
//!
//! Every setting has a default except the auth provider credentials, which are
//! required because every authenticated route depends on them.

use crate::errors::{Error, Result};
use crate::storage::DEFAULT_MAX_RECEIPT_BYTES;
use std::{env, fmt::Display, path::PathBuf, str::FromStr};
use tracing::{info, warn};

/// Runtime settings for the HTTP service.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Address the server listens on
    pub bind_address: String,
    /// Externally visible base URL, used to build receipt links
    pub public_base_url: String,
    /// Directory receipts are written to
    pub receipts_dir: PathBuf,
    /// Largest accepted receipt, in bytes
    pub receipt_max_bytes: usize,
    /// Base URL of the hosted auth provider
    pub auth_url: String,
    /// Public API key sent to the auth provider
    pub auth_anon_key: String,
}

impl Settings {
    /// Reads settings from the process environment.
    ///
    /// # Errors
    /// Returns an error if `AUTH_URL` or `AUTH_ANON_KEY` is missing, or a
    /// numeric setting does not parse.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            bind_address: try_load("BIND_ADDRESS", "0.0.0.0:8080")?,
            public_base_url: try_load::<String>("PUBLIC_BASE_URL", "http://localhost:8080")?
                .trim_end_matches('/')
                .to_string(),
            receipts_dir: PathBuf::from(try_load::<String>("RECEIPTS_DIR", "data/receipts")?),
            receipt_max_bytes: try_load(
                "RECEIPT_MAX_BYTES",
                &DEFAULT_MAX_RECEIPT_BYTES.to_string(),
            )?,
            auth_url: require("AUTH_URL")?,
            auth_anon_key: require("AUTH_ANON_KEY")?,
        })
    }
}

fn require(key: &str) -> Result<String> {
    env::var(key)
        .inspect_err(|_| warn!("Environment variable {key} not set"))
        .map_err(Error::EnvVar)
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse().map_err(|e| Error::Config {
        message: format!("Invalid {key} value {raw:?}: {e}"),
    })
}
