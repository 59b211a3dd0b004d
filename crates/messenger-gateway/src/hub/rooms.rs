//! Channel and private-room joins

use super::{Hub, Outbox};
use crate::events::ServerEvent;
use messenger_core::{ConnectionId, DomainError, Message, RoomKey};

impl Hub {
    /// Define a channel and move its creator into it
    pub fn create_channel(
        &mut self,
        from: &ConnectionId,
        name: &str,
        password: Option<String>,
    ) -> Result<Outbox, DomainError> {
        let username = self.registry.require(from)?.username.clone();
        let room = self.directory.create_channel(name, password)?;
        self.store.ensure_room(&room);
        self.directory.switch(from, room);

        tracing::info!(connection_id = %from, username = %username, channel = %name, "Channel created");

        let mut outbox = Outbox::new();
        self.push_channel_list(&mut outbox);
        outbox.push(
            from.clone(),
            ServerEvent::ReceiveMessage(Message::system(
                format!("Channel '{name}' created successfully. You have been added to it."),
                name,
            )),
        );
        Ok(outbox)
    }

    /// Switch into an existing channel and replay its history
    pub fn join_channel(
        &mut self,
        from: &ConnectionId,
        name: &str,
        password: Option<&str>,
    ) -> Result<Outbox, DomainError> {
        let username = self.registry.require(from)?.username.clone();
        let room = self.directory.authorize(name, password)?;
        self.directory.switch(from, room.clone());

        let history = self
            .store
            .deliver_history(&room, self.store.bound_for(&room), &username);

        tracing::debug!(
            connection_id = %from,
            channel = %name,
            history = history.len(),
            "Joined channel"
        );

        let mut outbox = Outbox::single(from.clone(), ServerEvent::LoadMessages(history));
        outbox.push(
            from.clone(),
            ServerEvent::ReceiveMessage(Message::system(format!("You joined {name}"), name)),
        );
        self.push_channel_list(&mut outbox);
        Ok(outbox)
    }

    /// Open the private room shared with `other`
    ///
    /// The other party is attached without disturbing their current room and is not notified.
    pub fn join_private(&mut self, from: &ConnectionId, other: &str) -> Result<Outbox, DomainError> {
        let username = self.registry.require(from)?.username.clone();
        let other_connection = self
            .registry
            .connection_of(other)
            .cloned()
            .ok_or_else(|| DomainError::RecipientOffline(other.to_string()))?;

        let room = RoomKey::private(&username, other);
        self.directory.switch(from, room.clone());
        self.directory.attach(&other_connection, &room);

        let history: Vec<Message> = self
            .store
            .deliver_history(&room, self.store.bound_for(&room), &username)
            .iter()
            .map(|message| message.with_room(other))
            .collect();

        tracing::debug!(
            connection_id = %from,
            with = %other,
            history = history.len(),
            "Opened private room"
        );

        let mut outbox = Outbox::single(from.clone(), ServerEvent::LoadMessages(history));
        self.push_channel_list(&mut outbox);
        Ok(outbox)
    }
}
