//! Individual WebSocket connection
//!
//! Represents a single WebSocket connection and its outbound queue.

use crate::events::ServerEvent;
use crate::protocol::GatewayMessage;
use messenger_core::ConnectionId;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Generate a fresh, unique connection id
#[must_use]
pub fn generate_connection_id() -> ConnectionId {
    ConnectionId::new(uuid::Uuid::new_v4().simple().to_string())
}

/// Reasons an event could not be queued for a connection
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("Outbound queue is full")]
    Full,

    #[error("Connection is closed")]
    Closed,

    #[error("Failed to encode event: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A single WebSocket connection
pub struct Connection {
    /// Connection ID, also the key of the presence snapshot
    id: ConnectionId,

    /// Channel to the socket's send task
    sender: mpsc::Sender<GatewayMessage>,

    /// Last sequence number sent
    sequence: AtomicU64,

    /// Last frame received from the client
    last_heartbeat: Mutex<Instant>,

    /// Connection creation time
    created_at: Instant,
}

impl Connection {
    /// Create a new connection
    pub fn new(id: ConnectionId, sender: mpsc::Sender<GatewayMessage>) -> Arc<Self> {
        let now = Instant::now();
        Arc::new(Self {
            id,
            sender,
            sequence: AtomicU64::new(0),
            last_heartbeat: Mutex::new(now),
            created_at: now,
        })
    }

    /// Get the connection ID
    pub fn id(&self) -> &ConnectionId {
        &self.id
    }

    /// Get the next sequence number
    pub fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Get the current sequence number
    pub fn current_sequence(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }

    /// Record client activity
    pub fn record_heartbeat(&self) {
        *self.last_heartbeat.lock() = Instant::now();
    }

    /// Get time since last client activity
    pub fn time_since_heartbeat(&self) -> Duration {
        self.last_heartbeat.lock().elapsed()
    }

    /// Get connection age
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    /// Try to queue a raw frame (non-blocking)
    pub fn try_send(&self, message: GatewayMessage) -> Result<(), DeliveryError> {
        self.sender.try_send(message).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => DeliveryError::Full,
            mpsc::error::TrySendError::Closed(_) => DeliveryError::Closed,
        })
    }

    /// Queue an event as a Dispatch frame with the next sequence number
    ///
    /// The sequence is only consumed when the frame was actually queued.
    pub fn dispatch(&self, event: &ServerEvent) -> Result<u64, DeliveryError> {
        let data = event.to_data()?;
        let permit = self.sender.try_reserve().map_err(|e| match e {
            mpsc::error::TrySendError::Full(()) => DeliveryError::Full,
            mpsc::error::TrySendError::Closed(()) => DeliveryError::Closed,
        })?;
        let sequence = self.next_sequence();
        permit.send(GatewayMessage::dispatch(
            event.event_type().as_str(),
            sequence,
            data,
        ));
        Ok(sequence)
    }

    /// Check if the send task has gone away
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("sequence", &self.sequence.load(Ordering::SeqCst))
            .field("created_at", &self.created_at)
            .finish()
    }
}
