//! Join, avatar and disconnect handling

use super::{Hub, Outbox};
use crate::events::ServerEvent;
use messenger_core::{ConnectionId, DomainError, JoinOutcome, Message, RoomKey};

impl Hub {
    /// Claim a username
    ///
    /// A fresh registration (or a rename) is placed into General and announced there.
    /// Re-sending the current name only repeats the sender's own snapshots.
    pub fn join(&mut self, from: &ConnectionId, username: &str) -> Result<Outbox, DomainError> {
        let outcome = self.registry.join(from, username)?;
        let mut outbox = Outbox::single(from.clone(), ServerEvent::JoinSuccess);

        if outcome == JoinOutcome::Rejoined {
            outbox.push(from.clone(), self.user_list());
            outbox.push(from.clone(), self.channel_list());
            return Ok(outbox);
        }

        if let JoinOutcome::Renamed { previous } = &outcome {
            tracing::info!(connection_id = %from, previous = %previous, username = %username, "User renamed");
        } else {
            tracing::info!(connection_id = %from, username = %username, "User joined");
        }

        let general = RoomKey::general();
        self.directory.switch(from, general.clone());
        self.push_presence(&mut outbox);
        self.announce(&general, format!("{username} joined General"), &mut outbox);

        Ok(outbox)
    }

    /// Replace the caller's avatar URL
    pub fn update_avatar(
        &mut self,
        from: &ConnectionId,
        avatar: String,
    ) -> Result<Outbox, DomainError> {
        let participant = self.registry.update_avatar(from, avatar)?;
        tracing::debug!(connection_id = %from, username = %participant.username, "Avatar updated");

        let mut outbox = Outbox::new();
        outbox.broadcast(&self.connections, self.user_list());
        Ok(outbox)
    }

    /// Tear down a connection
    ///
    /// Room membership is removed before the username is released so no broadcast can
    /// reach a half-removed participant.
    pub fn disconnect(&mut self, connection_id: &ConnectionId) -> Outbox {
        self.connections.remove(connection_id);
        self.directory.detach_all(connection_id);

        let mut outbox = Outbox::new();
        let Some(participant) = self.registry.remove(connection_id) else {
            tracing::debug!(connection_id = %connection_id, "Unregistered connection left");
            return outbox;
        };

        tracing::info!(connection_id = %connection_id, username = %participant.username, "User left");

        self.announce(
            &RoomKey::general(),
            format!("{} left", participant.username),
            &mut outbox,
        );
        self.push_presence(&mut outbox);
        outbox
    }

    /// Store a system notice in a room and fan it out to the room's members
    fn announce(&mut self, room: &RoomKey, content: String, outbox: &mut Outbox) {
        let notice = Message::system(content, room.to_string());
        self.store.append(room, notice.clone());
        outbox.broadcast(
            &self.directory.members_of(room),
            ServerEvent::ReceiveMessage(notice),
        );
    }
}
