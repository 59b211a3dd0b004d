//! Event payload definitions
//!
//! Defines the data structures for each dispatch event the hub emits.

use super::GatewayEventType;
use messenger_core::{ChannelSummary, ConnectionId, Message, Participant};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

// === Presence Payloads ===

/// One entry of the `updateUserList` snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEntry {
    pub username: String,
    pub avatar: String,
}

impl From<&Participant> for UserEntry {
    fn from(participant: &Participant) -> Self {
        Self {
            username: participant.username.clone(),
            avatar: participant.avatar.clone(),
        }
    }
}

/// Connection id → user snapshot
pub type UserList = BTreeMap<ConnectionId, UserEntry>;

// === Call Payloads ===

/// INCOMING_CALL event payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomingCallEvent {
    /// Opaque signaling blob from the caller
    pub signal: Value,
    /// Caller's username
    pub name: String,
    /// Caller's connection, used as the target of answer/reject/end
    pub from_socket_id: ConnectionId,
    pub video: bool,
}

/// CALL_ANSWERED event payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallAnsweredEvent {
    pub signal: Value,
}

// === Server Events ===

/// Every event the hub can address to a connection
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    JoinSuccess,
    /// Human-readable refusal reason
    JoinFail(String),
    UpdateUserList(UserList),
    ChannelList(Vec<ChannelSummary>),
    ReceiveMessage(Message),
    LoadMessages(Vec<Message>),
    IncomingCall(IncomingCallEvent),
    CallAnswered(CallAnsweredEvent),
    CallEnded,
}

impl ServerEvent {
    /// Event type sent in the `t` field
    #[must_use]
    pub const fn event_type(&self) -> GatewayEventType {
        match self {
            Self::JoinSuccess => GatewayEventType::JoinSuccess,
            Self::JoinFail(_) => GatewayEventType::JoinFail,
            Self::UpdateUserList(_) => GatewayEventType::UpdateUserList,
            Self::ChannelList(_) => GatewayEventType::ChannelList,
            Self::ReceiveMessage(_) => GatewayEventType::ReceiveMessage,
            Self::LoadMessages(_) => GatewayEventType::LoadMessages,
            Self::IncomingCall(_) => GatewayEventType::IncomingCall,
            Self::CallAnswered(_) => GatewayEventType::CallAnswered,
            Self::CallEnded => GatewayEventType::CallEnded,
        }
    }

    /// Serialize the event data for the `d` field
    pub fn to_data(&self) -> Result<Value, serde_json::Error> {
        match self {
            Self::JoinSuccess | Self::CallEnded => Ok(Value::Null),
            Self::JoinFail(reason) => Ok(Value::String(reason.clone())),
            Self::UpdateUserList(users) => serde_json::to_value(users),
            Self::ChannelList(channels) => serde_json::to_value(channels),
            Self::ReceiveMessage(message) => serde_json::to_value(message),
            Self::LoadMessages(messages) => serde_json::to_value(messages),
            Self::IncomingCall(call) => serde_json::to_value(call),
            Self::CallAnswered(answer) => serde_json::to_value(answer),
        }
    }

    /// The message carried by a `receiveMessage` event
    pub fn as_message(&self) -> Option<&Message> {
        match self {
            Self::ReceiveMessage(message) => Some(message),
            _ => None,
        }
    }
}
