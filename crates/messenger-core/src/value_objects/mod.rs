//! Value objects - immutable types that represent domain concepts

mod connection_id;
mod room_key;

pub use connection_id::ConnectionId;
pub use room_key::{RoomKey, PRIVATE_ROOM_SEPARATOR};
