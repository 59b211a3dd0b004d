//! Handler error types

use crate::protocol::CloseCode;
use thiserror::Error;
use validator::ValidationErrors;

/// Handler error type
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Frame could not be decoded into a client event
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Event decoded but its payload shape is unacceptable
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl HandlerError {
    /// Convert to a close code (if applicable)
    ///
    /// Validation failures drop the frame and keep the connection open.
    pub fn to_close_code(&self) -> Option<CloseCode> {
        match self {
            Self::InvalidPayload(_) => Some(CloseCode::DecodeError),
            Self::Validation(_) => None,
            Self::Internal(_) => Some(CloseCode::UnknownError),
        }
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidPayload(err.to_string())
    }
}

/// Handler result type
pub type HandlerResult<T> = Result<T, HandlerError>;
