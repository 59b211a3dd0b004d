//! Request handler (op 2)

use super::HandlerResult;
use crate::connection::Connection;
use crate::protocol::{ClientEvent, CloseCode};
use crate::server::GatewayState;
use std::sync::Arc;

/// Handles named client events
pub struct RequestHandler;

impl RequestHandler {
    /// Validate a client event and apply it to the hub
    pub fn handle(
        state: &GatewayState,
        connection: &Arc<Connection>,
        event: ClientEvent,
    ) -> HandlerResult<Option<CloseCode>> {
        event.validate()?;

        tracing::debug!(
            connection_id = %connection.id(),
            event = event.name(),
            "Request received"
        );

        let delivered = state.apply(connection.id(), event);

        tracing::trace!(connection_id = %connection.id(), delivered, "Request applied");

        Ok(None)
    }
}
