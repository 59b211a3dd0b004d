//! File upload endpoint
//!
//! `POST /upload` stores the multipart field `file` under the upload directory and
//! answers with the public URL the client then sends as message content.

mod error;

pub use error::UploadError;

use crate::server::GatewayState;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use serde::Serialize;
use std::path::Path;

/// Multipart field carrying the file
const FILE_FIELD: &str = "file";

/// Longest extension kept from the client's file name, dot excluded
const MAX_EXTENSION_LEN: usize = 10;

/// Successful upload response
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Public path of the stored file
    pub url: String,
    /// MIME type reported by the client
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Size in bytes
    pub size: usize,
}

/// Upload handler
pub async fn upload_handler(
    State(state): State<GatewayState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, UploadError> {
    let mut multipart = multipart.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Upload without multipart body");
        UploadError::NoFile
    })?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let original_name = field.file_name().unwrap_or_default().to_string();
        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field.bytes().await?;

        let filename = stored_file_name(&original_name);
        let upload_dir = Path::new(&state.config().storage.upload_dir);
        tokio::fs::create_dir_all(upload_dir).await?;
        tokio::fs::write(upload_dir.join(&filename), &data).await?;

        tracing::info!(
            file = %filename,
            original = %original_name,
            mime_type = %mime_type,
            size = data.len(),
            "File uploaded"
        );

        return Ok(Json(UploadResponse {
            url: format!("/uploads/{filename}"),
            mime_type,
            size: data.len(),
        }));
    }

    Err(UploadError::NoFile)
}

/// Collision-resistant name: `<unix millis>_<random>.<ext>`
fn stored_file_name(original: &str) -> String {
    let random = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "{}_{}{}",
        chrono::Utc::now().timestamp_millis(),
        &random[..8],
        extension_of(original)
    )
}

/// Sanitized extension of a client-supplied file name, `.bin` when unusable
fn extension_of(original: &str) -> String {
    Path::new(original)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| {
            !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .map_or_else(|| ".bin".to_string(), |ext| format!(".{}", ext.to_ascii_lowercase()))
}
