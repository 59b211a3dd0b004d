//! Connection manager
//!
//! Manages all active WebSocket connections using DashMap for thread-safe access.

use super::{Connection, DeliveryError};
use crate::hub::Outbox;
use crate::protocol::GatewayMessage;
use dashmap::DashMap;
use messenger_core::ConnectionId;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Manages all active WebSocket connections
#[derive(Default)]
pub struct ConnectionManager {
    /// Active connections by ID
    connections: DashMap<ConnectionId, Arc<Connection>>,
}

impl ConnectionManager {
    /// Create a new connection manager
    #[must_use]
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
        }
    }

    /// Create a new connection manager wrapped in Arc
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register a new connection
    pub fn add_connection(
        &self,
        id: ConnectionId,
        sender: mpsc::Sender<GatewayMessage>,
    ) -> Arc<Connection> {
        let connection = Connection::new(id.clone(), sender);
        self.connections.insert(id.clone(), connection.clone());

        tracing::debug!(connection_id = %id, "Connection added");

        connection
    }

    /// Remove a connection
    pub fn remove_connection(&self, id: &ConnectionId) -> Option<Arc<Connection>> {
        let removed = self.connections.remove(id).map(|(_, connection)| connection);
        if removed.is_some() {
            tracing::debug!(connection_id = %id, "Connection removed");
        }
        removed
    }

    /// Get a connection by ID
    pub fn get_connection(&self, id: &ConnectionId) -> Option<Arc<Connection>> {
        self.connections.get(id).map(|r| r.clone())
    }

    /// Check if a connection is registered
    pub fn has_connection(&self, id: &ConnectionId) -> bool {
        self.connections.contains_key(id)
    }

    /// Get the number of active connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Queue every envelope of an outbox on its target connection
    ///
    /// Never blocks. Envelopes for unknown, closed or saturated connections are
    /// dropped and logged. Returns the number of frames queued.
    pub fn deliver(&self, outbox: Outbox) -> usize {
        let mut delivered = 0;

        for envelope in outbox {
            let Some(connection) = self.get_connection(&envelope.to) else {
                tracing::trace!(
                    connection_id = %envelope.to,
                    event = %envelope.event.event_type(),
                    "Dropping event for unknown connection"
                );
                continue;
            };

            match connection.dispatch(&envelope.event) {
                Ok(_) => delivered += 1,
                Err(DeliveryError::Closed) => {
                    tracing::debug!(
                        connection_id = %envelope.to,
                        event = %envelope.event.event_type(),
                        "Dropping event for closed connection"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        connection_id = %envelope.to,
                        event = %envelope.event.event_type(),
                        error = %e,
                        "Failed to queue event"
                    );
                }
            }
        }

        delivered
    }
}
