//! Server payload definitions

use serde::{Deserialize, Serialize};

/// Payload for op 10 (Hello)
///
/// Sent by the server immediately after connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelloPayload {
    /// Heartbeat interval in milliseconds
    pub heartbeat_interval: u64,
    /// Identifier the server assigned to this connection
    pub connection_id: String,
}

impl HelloPayload {
    #[must_use]
    pub fn new(heartbeat_interval: u64, connection_id: impl Into<String>) -> Self {
        Self {
            heartbeat_interval,
            connection_id: connection_id.into(),
        }
    }
}
