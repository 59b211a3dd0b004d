//! Gateway events
//!
//! Defines all dispatch events the hub sends to clients.

mod event_types;
mod payloads;

pub use event_types::GatewayEventType;
pub use payloads::{CallAnsweredEvent, IncomingCallEvent, ServerEvent, UserEntry, UserList};
