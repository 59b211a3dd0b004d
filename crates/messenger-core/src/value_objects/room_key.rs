//! Room keys - the computed identifier of a broadcast scope
//!
//! A room is either a channel (General included) or a private pairing of two usernames.
//! A private key holds the two names themselves, sorted, so two different pairs can never
//! compare equal whatever characters the names contain. [`PRIVATE_ROOM_SEPARATOR`] is only
//! used when a private key is rendered for logs.

use crate::entities::GENERAL_CHANNEL;
use std::fmt;

/// Separator shown between the two names when a private key is displayed
pub const PRIVATE_ROOM_SEPARATOR: &str = "___PRIVATE___";

/// Broadcast scope identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RoomKey {
    /// A named channel, including General
    Channel(String),
    /// A one-to-one private room; `first <= second`
    Private { first: String, second: String },
}

impl RoomKey {
    /// The always-present General channel
    #[must_use]
    pub fn general() -> Self {
        Self::Channel(GENERAL_CHANNEL.to_string())
    }

    /// Key for a named channel
    pub fn channel(name: impl Into<String>) -> Self {
        Self::Channel(name.into())
    }

    /// Symmetric key for the private room shared by two usernames
    #[must_use]
    pub fn private(a: &str, b: &str) -> Self {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        Self::Private {
            first: first.to_string(),
            second: second.to_string(),
        }
    }

    #[inline]
    pub fn is_private(&self) -> bool {
        matches!(self, Self::Private { .. })
    }

    #[inline]
    pub fn is_general(&self) -> bool {
        matches!(self, Self::Channel(name) if name == GENERAL_CHANNEL)
    }

    /// Channel name, if this is a channel
    pub fn channel_name(&self) -> Option<&str> {
        match self {
            Self::Channel(name) => Some(name),
            Self::Private { .. } => None,
        }
    }

    /// The two usernames of a private room, in key order
    pub fn participants(&self) -> Option<(&str, &str)> {
        match self {
            Self::Private { first, second } => Some((first, second)),
            Self::Channel(_) => None,
        }
    }

    /// For a private room, the participant that is not `username`
    ///
    /// A self-conversation yields `username` itself.
    pub fn counterpart(&self, username: &str) -> Option<&str> {
        let (a, b) = self.participants()?;
        if a == username {
            Some(b)
        } else if b == username {
            Some(a)
        } else {
            None
        }
    }
}

impl fmt::Display for RoomKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Channel(name) => f.write_str(name),
            Self::Private { first, second } => {
                write!(f, "{first}{PRIVATE_ROOM_SEPARATOR}{second}")
            }
        }
    }
}
