//! Domain errors - error types for the hub state machine

use thiserror::Error;

/// Domain layer errors
///
/// Every variant is recoverable and is reported only to the connection that caused it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    // =========================================================================
    // Identity Errors
    // =========================================================================
    #[error("Username '{0}' is already taken.")]
    NameTaken(String),

    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Connection is not registered")]
    SenderUnknown,

    // =========================================================================
    // Channel Errors
    // =========================================================================
    #[error("Channel '{0}' does not exist.")]
    ChannelNotFound(String),

    #[error("Wrong password for channel.")]
    WrongPassword(String),

    #[error("Channel '{0}' already exists.")]
    ChannelAlreadyExists(String),

    #[error("Invalid channel name: {0}")]
    InvalidChannelName(String),

    // =========================================================================
    // Routing Errors
    // =========================================================================
    #[error("User {0} is offline.")]
    RecipientOffline(String),

    #[error("You are not a member of {0}.")]
    NotAMember(String),
}

impl DomainError {
    /// Get an error code string for logs and replies
    pub fn code(&self) -> &'static str {
        match self {
            Self::NameTaken(_) => "NAME_TAKEN",
            Self::InvalidUsername(_) => "INVALID_USERNAME",
            Self::SenderUnknown => "SENDER_UNKNOWN",
            Self::ChannelNotFound(_) => "CHANNEL_NOT_FOUND",
            Self::WrongPassword(_) => "WRONG_PASSWORD",
            Self::ChannelAlreadyExists(_) => "CHANNEL_ALREADY_EXISTS",
            Self::InvalidChannelName(_) => "INVALID_CHANNEL_NAME",
            Self::RecipientOffline(_) => "RECIPIENT_OFFLINE",
            Self::NotAMember(_) => "NOT_A_MEMBER",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ChannelNotFound(_) | Self::RecipientOffline(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidUsername(_) | Self::InvalidChannelName(_))
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::WrongPassword(_) | Self::NotAMember(_) | Self::SenderUnknown
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::NameTaken(_) | Self::ChannelAlreadyExists(_))
    }

    /// Whether the originating connection should be told about this error
    ///
    /// Events from unregistered connections are dropped without a reply.
    pub fn is_silent(&self) -> bool {
        matches!(self, Self::SenderUnknown)
    }
}
