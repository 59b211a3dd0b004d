//! Connection management
//!
//! Tracks live WebSocket connections and delivers hub output to them.

mod connection;
mod manager;

pub use connection::{generate_connection_id, Connection, DeliveryError};
pub use manager::ConnectionManager;
