//! Receipt storage.
//!
//! Uploads are checked against a [`ReceiptPolicy`] before they reach a
//! [`ReceiptStore`]. The store only persists bytes under a key and hands back a
//! public URL; it knows nothing about expenses.

use crate::errors::{Error, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{error, info, instrument};

/// Largest accepted receipt unless configured otherwise (10 MB).
pub const DEFAULT_MAX_RECEIPT_BYTES: usize = 10 * 1024 * 1024;

/// Key prefix every receipt is stored under.
pub const RECEIPT_PREFIX: &str = "receipts";

/// Size and content-type rules for receipt uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiptPolicy {
    /// Largest accepted file, in bytes
    pub max_bytes: usize,
}

impl Default for ReceiptPolicy {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_RECEIPT_BYTES,
        }
    }
}

impl ReceiptPolicy {
    /// Accepts non-empty images and PDFs no larger than `max_bytes`.
    ///
    /// # Errors
    /// Returns [`Error::UploadRejected`] describing the first rule broken.
    pub fn check(&self, content_type: Option<&str>, size: usize) -> Result<()> {
        if size == 0 {
            return Err(rejected("Uploaded file is empty"));
        }
        if size > self.max_bytes {
            return Err(rejected(format!(
                "File is too large. Maximum size is {} MB",
                self.max_bytes / (1024 * 1024)
            )));
        }

        let content_type = content_type.unwrap_or_default().to_ascii_lowercase();
        let essence = content_type.split(';').next().unwrap_or_default().trim();
        if !(essence.starts_with("image/") || essence == "application/pdf") {
            return Err(rejected("Only image and PDF receipts are accepted"));
        }
        Ok(())
    }
}

fn rejected(message: impl Into<String>) -> Error {
    Error::UploadRejected {
        message: message.into(),
    }
}

/// Reduces a client-supplied file name to a safe final path component.
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    let last = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = last
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "receipt".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Object key for a receipt: `receipts/{unix-millis}-{filename}`.
#[must_use]
pub fn receipt_key(filename: &str, unix_millis: i64) -> String {
    format!(
        "{RECEIPT_PREFIX}/{unix_millis}-{}",
        sanitize_filename(filename)
    )
}

/// A receipt file received from a client.
#[derive(Debug, Clone)]
pub struct ReceiptUpload {
    /// Original file name
    pub filename: String,
    /// Declared content type
    pub content_type: Option<String>,
    /// File contents
    pub bytes: Vec<u8>,
}

/// Where a stored receipt can be fetched from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredReceipt {
    /// Public URL of the stored file
    pub url: String,
    /// Original file name
    pub filename: String,
    /// Size in bytes
    pub size: usize,
}

/// Blob store receipts are written to.
#[async_trait]
pub trait ReceiptStore: Send + Sync {
    /// Persists `bytes` under `key` and returns the public URL.
    async fn put(&self, key: &str, content_type: Option<&str>, bytes: &[u8]) -> Result<String>;
}

/// Checks an upload against the policy and writes it to the store.
///
/// # Errors
/// Returns [`Error::UploadRejected`] when the policy refuses the file, or
/// [`Error::Storage`] when the store fails.
#[instrument(skip(store, upload), fields(filename = %upload.filename, size = upload.bytes.len()))]
pub async fn store_receipt(
    store: &dyn ReceiptStore,
    policy: ReceiptPolicy,
    upload: ReceiptUpload,
) -> Result<StoredReceipt> {
    policy.check(upload.content_type.as_deref(), upload.bytes.len())?;

    let key = receipt_key(&upload.filename, Utc::now().timestamp_millis());
    let url = store
        .put(&key, upload.content_type.as_deref(), &upload.bytes)
        .await?;
    info!(key, "Stored receipt");

    Ok(StoredReceipt {
        url,
        filename: upload.filename,
        size: upload.bytes.len(),
    })
}

/// Receipt store backed by a local directory.
///
/// Files are written flat into `root`; the API serves that directory under
/// `/receipts`, so a key maps to `{public_base_url}/{key}`.
#[derive(Debug, Clone)]
pub struct LocalReceiptStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalReceiptStore {
    /// Creates a store writing into `root`.
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Directory receipts are written to.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl ReceiptStore for LocalReceiptStore {
    async fn put(&self, key: &str, _content_type: Option<&str>, bytes: &[u8]) -> Result<String> {
        let name = Path::new(key)
            .file_name()
            .ok_or_else(|| rejected("Invalid receipt key"))?;
        let path = self.root.join(name);

        let write = async {
            tokio::fs::create_dir_all(&self.root).await?;
            tokio::fs::write(&path, bytes).await
        };
        write.await.map_err(|source| {
            error!("Failed to write receipt to {}: {source}", path.display());
            Error::Storage { source }
        })?;

        Ok(format!("{}/{key}", self.public_base_url))
    }
}
