//! Gateway event types
//!
//! Event names sent in the `t` field of dispatch frames.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Gateway event types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GatewayEventType {
    // Identity events
    /// Username accepted
    JoinSuccess,
    /// Join, channel join or channel creation refused
    JoinFail,

    // Presence events
    /// Full connection → user snapshot
    UpdateUserList,
    /// Full channel list with member counts
    ChannelList,

    // Message events
    /// One live or system message
    ReceiveMessage,
    /// History replay on room entry
    LoadMessages,

    // Call relay events
    IncomingCall,
    CallAnswered,
    CallEnded,
}

impl GatewayEventType {
    /// Get the string representation of the event type
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::JoinSuccess => "joinSuccess",
            Self::JoinFail => "joinFail",
            Self::UpdateUserList => "updateUserList",
            Self::ChannelList => "channelList",
            Self::ReceiveMessage => "receiveMessage",
            Self::LoadMessages => "loadMessages",
            Self::IncomingCall => "incomingCall",
            Self::CallAnswered => "callAnswered",
            Self::CallEnded => "callEnded",
        }
    }

    /// Parse an event type from a string
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "joinSuccess" => Some(Self::JoinSuccess),
            "joinFail" => Some(Self::JoinFail),
            "updateUserList" => Some(Self::UpdateUserList),
            "channelList" => Some(Self::ChannelList),
            "receiveMessage" => Some(Self::ReceiveMessage),
            "loadMessages" => Some(Self::LoadMessages),
            "incomingCall" => Some(Self::IncomingCall),
            "callAnswered" => Some(Self::CallAnswered),
            "callEnded" => Some(Self::CallEnded),
            _ => None,
        }
    }
}

impl fmt::Display for GatewayEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
