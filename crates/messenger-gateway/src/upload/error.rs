//! Upload errors

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use messenger_common::{AppError, ErrorResponse};
use thiserror::Error;

/// Upload failures
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("No files were uploaded.")]
    NoFile,

    #[error("File exceeds the upload limit")]
    TooLarge,

    #[error("Malformed multipart body: {0}")]
    Multipart(String),

    #[error("Failed to store file: {0}")]
    Io(#[from] std::io::Error),
}

impl From<MultipartError> for UploadError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::TooLarge
        } else {
            Self::Multipart(err.body_text())
        }
    }
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::NoFile | UploadError::Multipart(_) => Self::validation(err),
            UploadError::TooLarge => Self::PayloadTooLarge(err.to_string()),
            UploadError::Io(e) => Self::Io(e),
        }
    }
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        let error = AppError::from(self);
        let status =
            StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(error = %error, code = error.error_code(), "Upload failed");
        } else {
            tracing::debug!(error = %error, code = error.error_code(), "Upload rejected");
        }

        (status, Json(ErrorResponse::from(&error))).into_response()
    }
}
