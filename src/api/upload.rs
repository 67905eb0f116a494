//! Receipt upload endpoint and the multipart reader shared with the
//! expense receipt route.

use crate::{
    api::AppState,
    errors::{Error, Result},
    storage::{ReceiptUpload, StoredReceipt},
};
use axum::{
    Json,
    extract::{Multipart, State},
};

/// Multipart field that carries the receipt.
pub const FILE_FIELD: &str = "file";

fn upload_error(message: impl Into<String>) -> Error {
    Error::UploadRejected {
        message: message.into(),
    }
}

/// Reads the `file` field of a multipart form. Other fields are skipped.
///
/// # Errors
/// Returns [`Error::UploadRejected`] when the form is malformed or has no file.
pub async fn read_receipt(multipart: &mut Multipart) -> Result<ReceiptUpload> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| upload_error(e.body_text()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or("receipt").to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| upload_error(e.body_text()))?;

        return Ok(ReceiptUpload {
            filename,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    Err(upload_error("No file provided"))
}

/// `POST /api/upload-receipt`
///
/// Answers `{url, filename, size}`; failures are `{error}` with 400 for a
/// rejected file and 500 when the store fails.
pub async fn upload_receipt(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<StoredReceipt>> {
    let upload = read_receipt(&mut multipart).await?;
    Ok(Json(state.repo.upload_receipt(upload).await?))
}
