//! # messenger-core
//!
//! Domain layer for the messenger hub: participants, channels, room keys, bounded message
//! history, the identity registry and the room directory.
//! This crate has no knowledge of the transport; every operation is synchronous and is
//! expected to run inside the hub's single critical section.

pub mod directory;
pub mod entities;
pub mod error;
pub mod registry;
pub mod store;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use directory::{Membership, RoomDirectory};
pub use entities::{
    validate_channel_name, validate_username, Channel, ChannelSummary, Message, MessageKind,
    Participant, SenderSnapshot, GENERAL_CHANNEL,
};
pub use error::DomainError;
pub use registry::{IdentityRegistry, JoinOutcome};
pub use store::{HistoryLimits, MessageStore};
pub use value_objects::{ConnectionId, RoomKey, PRIVATE_ROOM_SEPARATOR};
