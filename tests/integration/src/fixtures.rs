//! Test fixtures and data generators
//!
//! Provides reusable test data for integration tests.

use messenger_gateway::protocol::{ChannelRequestPayload, ClientEvent, SendMessagePayload};
use messenger_core::MessageKind;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Unique username with a readable prefix
pub fn unique_name(prefix: &str) -> String {
    format!("{prefix}{}", unique_suffix())
}

/// `sendMessage` to a channel
pub fn channel_message(room: &str, content: &str) -> ClientEvent {
    ClientEvent::SendMessage(SendMessagePayload {
        room: room.to_string(),
        is_private: false,
        kind: MessageKind::Text,
        content: content.to_string(),
    })
}

/// `sendMessage` to a user
pub fn private_message(to: &str, content: &str) -> ClientEvent {
    ClientEvent::SendMessage(SendMessagePayload {
        room: to.to_string(),
        is_private: true,
        kind: MessageKind::Text,
        content: content.to_string(),
    })
}

/// `createChannel` request
pub fn create_channel(name: &str, password: Option<&str>) -> ClientEvent {
    ClientEvent::CreateChannel(channel_request(name, password))
}

/// `joinChannel` request
pub fn join_channel(name: &str, password: Option<&str>) -> ClientEvent {
    ClientEvent::JoinChannel(channel_request(name, password))
}

fn channel_request(name: &str, password: Option<&str>) -> ChannelRequestPayload {
    ChannelRequestPayload {
        name: name.to_string(),
        password: password.map(str::to_string),
    }
}
