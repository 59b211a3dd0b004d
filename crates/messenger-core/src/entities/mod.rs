//! Domain entities

mod channel;
mod message;
mod participant;

pub use channel::{validate_channel_name, Channel, ChannelSummary, GENERAL_CHANNEL};
pub use message::{Message, MessageKind};
pub use participant::{validate_username, Participant, SenderSnapshot};
