//! Gateway state
//!
//! Application state for the gateway server.

use crate::connection::{Connection, ConnectionManager};
use crate::hub::Hub;
use crate::protocol::{ClientEvent, GatewayMessage};
use messenger_common::AppConfig;
use messenger_core::{ConnectionId, HistoryLimits};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Gateway application state
///
/// Holds all shared dependencies for the gateway server.
#[derive(Clone)]
pub struct GatewayState {
    /// Registry, directory and history behind one lock
    hub: Arc<Mutex<Hub>>,
    /// Connection manager for WebSocket connections
    connection_manager: Arc<ConnectionManager>,
    /// Application configuration
    config: Arc<AppConfig>,
}

impl GatewayState {
    /// Create a new gateway state
    pub fn new(config: AppConfig) -> Self {
        let limits = HistoryLimits {
            channel: config.hub.channel_history_limit,
            private: config.hub.private_history_limit,
        };

        Self {
            hub: Arc::new(Mutex::new(Hub::new(limits))),
            connection_manager: ConnectionManager::new_shared(),
            config: Arc::new(config),
        }
    }

    /// Register a connection with the manager and the hub
    pub fn connect(
        &self,
        id: ConnectionId,
        sender: mpsc::Sender<GatewayMessage>,
    ) -> Arc<Connection> {
        let mut hub = self.hub.lock();
        let connection = self.connection_manager.add_connection(id.clone(), sender);
        hub.connect(id);
        connection
    }

    /// Apply a client event and queue its output before releasing the hub
    ///
    /// Returns the number of frames queued.
    pub fn apply(&self, from: &ConnectionId, event: ClientEvent) -> usize {
        let mut hub = self.hub.lock();
        let outbox = hub.handle(from, event);
        self.connection_manager.deliver(outbox)
    }

    /// Remove a connection from the hub and the manager
    pub fn disconnect(&self, id: &ConnectionId) -> usize {
        let delivered = {
            let mut hub = self.hub.lock();
            let outbox = hub.disconnect(id);
            self.connection_manager.deliver(outbox)
        };
        self.connection_manager.remove_connection(id);
        delivered
    }

    /// Get the hub
    pub fn hub(&self) -> &Mutex<Hub> {
        &self.hub
    }

    /// Get the connection manager
    pub fn connection_manager(&self) -> &ConnectionManager {
        &self.connection_manager
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field(
                "connections",
                &self.connection_manager.connection_count(),
            )
            .field("config", &"AppConfig")
            .finish()
    }
}
