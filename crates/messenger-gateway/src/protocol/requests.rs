//! Client request definitions
//!
//! Every op 2 frame carries one named client event. The `t` field selects the variant and
//! `d` holds its payload, so `{"op":2,"t":"joinPrivate","d":"bob"}` parses into
//! [`ClientEvent::JoinPrivate`].

use messenger_core::MessageKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationError, ValidationErrors};

/// Upper bound on message content, in characters
pub const MAX_CONTENT_LEN: u64 = 64 * 1024;

/// Named client events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "d", rename_all = "camelCase")]
pub enum ClientEvent {
    /// Claim a username
    Join(String),
    /// Replace the caller's avatar URL
    UpdateAvatar(String),
    /// Send to a channel or, with `isPrivate`, to a user
    SendMessage(SendMessagePayload),
    /// Switch into an existing channel
    JoinChannel(ChannelRequestPayload),
    /// Create a channel and switch into it
    CreateChannel(ChannelRequestPayload),
    /// Open the private room shared with another user
    JoinPrivate(String),
    CallUser(CallUserPayload),
    AnswerCall(AnswerCallPayload),
    RejectCall(CallTargetPayload),
    EndCall(CallTargetPayload),
}

impl ClientEvent {
    /// Event name as sent in the `t` field
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Join(_) => "join",
            Self::UpdateAvatar(_) => "updateAvatar",
            Self::SendMessage(_) => "sendMessage",
            Self::JoinChannel(_) => "joinChannel",
            Self::CreateChannel(_) => "createChannel",
            Self::JoinPrivate(_) => "joinPrivate",
            Self::CallUser(_) => "callUser",
            Self::AnswerCall(_) => "answerCall",
            Self::RejectCall(_) => "rejectCall",
            Self::EndCall(_) => "endCall",
        }
    }

    /// Validate the payload shape
    ///
    /// Name and password rules belong to the hub and are reported back to the client;
    /// this only rejects payloads no well-behaved client produces.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        match self {
            Self::SendMessage(payload) => payload.validate(),
            Self::CallUser(payload) => payload.validate(),
            Self::AnswerCall(payload) => payload.validate(),
            Self::RejectCall(payload) | Self::EndCall(payload) => payload.validate(),
            Self::Join(_)
            | Self::UpdateAvatar(_)
            | Self::JoinChannel(_)
            | Self::CreateChannel(_)
            | Self::JoinPrivate(_) => Ok(()),
        }
    }
}

/// `sendMessage` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendMessagePayload {
    /// Channel name, or the recipient's username when `is_private`
    #[validate(length(min = 1))]
    pub room: String,
    #[serde(default)]
    pub is_private: bool,
    #[serde(rename = "type", default)]
    #[validate(custom(function = "reject_system_kind"))]
    pub kind: MessageKind,
    #[validate(length(max = MAX_CONTENT_LEN))]
    pub content: String,
}

/// `joinChannel` / `createChannel` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelRequestPayload {
    pub name: String,
    #[serde(default)]
    pub password: Option<String>,
}

/// `callUser` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CallUserPayload {
    #[validate(length(min = 1))]
    pub user_to_call: String,
    #[serde(default)]
    pub signal_data: Value,
    #[serde(default)]
    pub video: bool,
}

/// `answerCall` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AnswerCallPayload {
    #[validate(length(min = 1))]
    pub to_socket_id: String,
    #[serde(default)]
    pub signal: Value,
}

/// `rejectCall` / `endCall` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CallTargetPayload {
    #[validate(length(min = 1))]
    pub to_socket_id: String,
}

fn reject_system_kind(kind: &MessageKind) -> Result<(), ValidationError> {
    if *kind == MessageKind::System {
        return Err(ValidationError::new("system_kind_reserved"));
    }
    Ok(())
}
