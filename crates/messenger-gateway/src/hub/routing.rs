//! Message routing

use super::{Hub, Outbox};
use crate::events::ServerEvent;
use crate::protocol::SendMessagePayload;
use messenger_core::{ConnectionId, DomainError, Message, RoomKey};

impl Hub {
    /// Store a message and fan it out to every member of its room
    pub fn send_message(
        &mut self,
        from: &ConnectionId,
        payload: SendMessagePayload,
    ) -> Result<Outbox, DomainError> {
        if payload.is_private {
            self.send_private(from, payload)
        } else {
            self.send_to_channel(from, payload)
        }
    }

    fn send_private(
        &mut self,
        from: &ConnectionId,
        payload: SendMessagePayload,
    ) -> Result<Outbox, DomainError> {
        let sender = self.registry.require(from)?.snapshot();
        let recipient = payload.room;
        let recipient_connection = self
            .registry
            .connection_of(&recipient)
            .cloned()
            .ok_or_else(|| DomainError::RecipientOffline(recipient.clone()))?;

        let room = RoomKey::private(&sender.username, &recipient);
        self.directory.attach(from, &room);
        self.directory.attach(&recipient_connection, &room);

        let message = Message::new(sender, payload.kind, payload.content, recipient.as_str(), true);
        self.store.append(&room, message.clone());

        tracing::debug!(
            connection_id = %from,
            to = %recipient,
            kind = ?message.kind,
            "Private message routed"
        );

        let mut outbox = Outbox::new();
        for member in self.directory.members_of(&room) {
            let Some(viewer) = self.registry.get(&member) else {
                continue;
            };
            let shown_as = room.counterpart(&viewer.username).unwrap_or(recipient.as_str());
            outbox.push(
                member,
                ServerEvent::ReceiveMessage(message.with_room(shown_as)),
            );
        }
        Ok(outbox)
    }

    fn send_to_channel(
        &mut self,
        from: &ConnectionId,
        payload: SendMessagePayload,
    ) -> Result<Outbox, DomainError> {
        let sender = self.registry.require(from)?.snapshot();
        let room = RoomKey::channel(payload.room.as_str());
        if !self.directory.is_member(from, &room) {
            return Err(DomainError::NotAMember(payload.room));
        }

        let message = Message::new(sender, payload.kind, payload.content, payload.room, false);
        self.store.append(&room, message.clone());

        tracing::debug!(
            connection_id = %from,
            room = %room,
            kind = ?message.kind,
            "Channel message routed"
        );

        let mut outbox = Outbox::new();
        outbox.broadcast(
            &self.directory.members_of(&room),
            ServerEvent::ReceiveMessage(message),
        );
        Ok(outbox)
    }
}
