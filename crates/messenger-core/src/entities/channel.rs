//! Channel entity - a named, optionally password-protected broadcast group

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Name of the channel every participant starts in
pub const GENERAL_CHANNEL: &str = "General";

/// Maximum channel name length in characters
pub const MAX_CHANNEL_NAME_LEN: usize = 64;

/// Channel definition
///
/// Membership is not stored here; it is derived from room assignments in the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub name: String,
    password: Option<String>,
}

impl Channel {
    /// Create a channel; an empty password means the channel is open
    pub fn new(name: impl Into<String>, password: Option<String>) -> Self {
        Self {
            name: name.into(),
            password: password.filter(|p| !p.is_empty()),
        }
    }

    /// The General channel
    #[must_use]
    pub fn general() -> Self {
        Self::new(GENERAL_CHANNEL, None)
    }

    /// Whether joining requires a password
    #[inline]
    pub fn is_protected(&self) -> bool {
        self.password.is_some()
    }

    /// Check a supplied password (plain string equality)
    pub fn accepts(&self, supplied: Option<&str>) -> bool {
        match &self.password {
            None => true,
            Some(expected) => supplied == Some(expected.as_str()),
        }
    }
}

/// Channel entry of the presence channel list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelSummary {
    pub name: String,
    pub members: usize,
}

/// Validate a requested channel name
pub fn validate_channel_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidChannelName(
            "channel name cannot be empty".to_string(),
        ));
    }
    if name.chars().count() > MAX_CHANNEL_NAME_LEN {
        return Err(DomainError::InvalidChannelName(format!(
            "channel name must be at most {MAX_CHANNEL_NAME_LEN} characters"
        )));
    }
    Ok(())
}
