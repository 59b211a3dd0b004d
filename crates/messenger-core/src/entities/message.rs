//! Message entity - one chat message or system notice

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::participant::SenderSnapshot;

/// Kind of message content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Text,
    Image,
    Video,
    Audio,
    File,
    System,
}

/// Message entity
///
/// `room` is the logical room shown to the client. For private messages it is the
/// other participant's username, never the internal private-room key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<SenderSnapshot>,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub is_private: bool,
    pub room: String,
    #[serde(default)]
    pub read_by: BTreeSet<String>,
}

impl Message {
    /// Create a user message; the sender has read it by definition
    pub fn new(
        sender: SenderSnapshot,
        kind: MessageKind,
        content: impl Into<String>,
        room: impl Into<String>,
        is_private: bool,
    ) -> Self {
        let mut read_by = BTreeSet::new();
        read_by.insert(sender.username.clone());
        Self {
            sender: Some(sender),
            kind,
            content: content.into(),
            timestamp: Utc::now(),
            is_private,
            room: room.into(),
            read_by,
        }
    }

    /// Create a server-generated notice
    pub fn system(content: impl Into<String>, room: impl Into<String>) -> Self {
        Self {
            sender: None,
            kind: MessageKind::System,
            content: content.into(),
            timestamp: Utc::now(),
            is_private: false,
            room: room.into(),
            read_by: BTreeSet::new(),
        }
    }

    /// Copy of this message with a different display room
    #[must_use]
    pub fn with_room(&self, room: impl Into<String>) -> Self {
        Self {
            room: room.into(),
            ..self.clone()
        }
    }

    /// Record that `username` has seen this message; returns whether it was new
    pub fn mark_read(&mut self, username: &str) -> bool {
        self.read_by.insert(username.to_string())
    }

    #[inline]
    pub fn is_read_by(&self, username: &str) -> bool {
        self.read_by.contains(username)
    }

    #[inline]
    pub fn is_system(&self) -> bool {
        self.kind == MessageKind::System
    }

    /// Username of the sender, if any
    pub fn sender_name(&self) -> Option<&str> {
        self.sender.as_ref().map(|s| s.username.as_str())
    }
}
