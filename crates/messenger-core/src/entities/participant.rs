//! Participant entity - one named user bound to one live connection

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::{ConnectionId, PRIVATE_ROOM_SEPARATOR};

/// Maximum username length in characters
pub const MAX_USERNAME_LEN: usize = 32;

/// A connected, named participant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub connection_id: ConnectionId,
    pub username: String,
    pub avatar: String,
}

impl Participant {
    /// Create a participant with the default avatar for its name
    pub fn new(connection_id: ConnectionId, username: impl Into<String>) -> Self {
        let username = username.into();
        let avatar = Self::default_avatar_url(&username);
        Self {
            connection_id,
            username,
            avatar,
        }
    }

    /// Deterministic avatar derived from the username
    pub fn default_avatar_url(username: &str) -> String {
        format!(
            "https://ui-avatars.com/api/?name={}&background=667eea&color=fff&bold=true",
            urlencoding::encode(username)
        )
    }

    /// Immutable copy of the identity, embedded into messages
    pub fn snapshot(&self) -> SenderSnapshot {
        SenderSnapshot {
            username: self.username.clone(),
            avatar: self.avatar.clone(),
        }
    }
}

/// Sender identity captured at send time
///
/// Later avatar changes do not touch messages already stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderSnapshot {
    pub username: String,
    pub avatar: String,
}

/// Validate a requested username
///
/// Names must be non-blank, at most [`MAX_USERNAME_LEN`] characters, free of control
/// characters, and must not contain the private-room separator.
pub fn validate_username(username: &str) -> Result<(), DomainError> {
    if username.trim().is_empty() {
        return Err(DomainError::InvalidUsername(
            "username cannot be empty".to_string(),
        ));
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(DomainError::InvalidUsername(format!(
            "username must be at most {MAX_USERNAME_LEN} characters"
        )));
    }
    if username.chars().any(char::is_control) {
        return Err(DomainError::InvalidUsername(
            "username cannot contain control characters".to_string(),
        ));
    }
    if username.contains(PRIVATE_ROOM_SEPARATOR) {
        return Err(DomainError::InvalidUsername(format!(
            "username cannot contain '{PRIVATE_ROOM_SEPARATOR}'"
        )));
    }
    Ok(())
}
