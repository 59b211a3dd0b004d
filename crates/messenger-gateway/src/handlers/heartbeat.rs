//! Heartbeat handler (op 1)

use super::{HandlerError, HandlerResult};
use crate::connection::{Connection, DeliveryError};
use crate::protocol::{CloseCode, GatewayMessage};
use std::sync::Arc;

/// Handles heartbeat messages
pub struct HeartbeatHandler;

impl HeartbeatHandler {
    /// Handle a heartbeat from the client
    ///
    /// The `last_sequence` is the client's last received sequence number (or None if none received).
    pub fn handle(
        connection: &Arc<Connection>,
        last_sequence: Option<u64>,
    ) -> HandlerResult<Option<CloseCode>> {
        connection.record_heartbeat();

        tracing::trace!(
            connection_id = %connection.id(),
            client_seq = ?last_sequence,
            server_seq = connection.current_sequence(),
            "Heartbeat received"
        );

        match connection.try_send(GatewayMessage::heartbeat_ack()) {
            Ok(()) => Ok(None),
            Err(DeliveryError::Closed) => Err(HandlerError::Internal(
                "Failed to send heartbeat ACK".to_string(),
            )),
            Err(e) => {
                // Ack is best-effort on a full queue
                tracing::warn!(
                    connection_id = %connection.id(),
                    error = %e,
                    "Heartbeat ACK dropped"
                );
                Ok(None)
            }
        }
    }
}
