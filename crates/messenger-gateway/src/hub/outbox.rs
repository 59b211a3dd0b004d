//! Outbound envelopes
//!
//! Hub operations never touch sockets. They return an [`Outbox`] of addressed events
//! which the connection manager queues while the hub lock is still held.

use crate::events::ServerEvent;
use messenger_core::ConnectionId;

/// One outbound server event addressed to one connection
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub to: ConnectionId,
    pub event: ServerEvent,
}

/// Ordered list of envelopes produced by one hub operation
#[derive(Debug, Default)]
pub struct Outbox {
    envelopes: Vec<Envelope>,
}

impl Outbox {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Outbox holding a single envelope
    #[must_use]
    pub fn single(to: ConnectionId, event: ServerEvent) -> Self {
        let mut outbox = Self::new();
        outbox.push(to, event);
        outbox
    }

    /// Address an event to one connection
    pub fn push(&mut self, to: ConnectionId, event: ServerEvent) {
        self.envelopes.push(Envelope { to, event });
    }

    /// Address a copy of an event to every listed connection
    pub fn broadcast<'a, I>(&mut self, targets: I, event: ServerEvent)
    where
        I: IntoIterator<Item = &'a ConnectionId>,
    {
        for to in targets {
            self.envelopes.push(Envelope {
                to: to.clone(),
                event: event.clone(),
            });
        }
    }

    pub fn len(&self) -> usize {
        self.envelopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.envelopes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Envelope> {
        self.envelopes.iter()
    }

    /// Events addressed to `connection_id`, in delivery order
    pub fn events_for(&self, connection_id: &ConnectionId) -> std::vec::IntoIter<&ServerEvent> {
        self.envelopes
            .iter()
            .filter(|envelope| envelope.to == *connection_id)
            .map(|envelope| &envelope.event)
            .collect::<Vec<_>>()
            .into_iter()
    }
}

impl IntoIterator for Outbox {
    type Item = Envelope;
    type IntoIter = std::vec::IntoIter<Envelope>;

    fn into_iter(self) -> Self::IntoIter {
        self.envelopes.into_iter()
    }
}
