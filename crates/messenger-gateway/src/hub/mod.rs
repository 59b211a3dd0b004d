//! Routing hub
//!
//! Owns the identity registry, the room directory and the message store. Every client
//! event is applied here as one synchronous step that returns the envelopes it produced;
//! the gateway runs each step under a single lock and queues the envelopes before
//! releasing it, so per-room history order equals per-recipient delivery order.

mod calls;
mod identity;
mod outbox;
mod presence;
mod rooms;
mod routing;

pub use outbox::{Envelope, Outbox};

use crate::events::ServerEvent;
use crate::protocol::ClientEvent;
use messenger_core::{
    ConnectionId, DomainError, HistoryLimits, IdentityRegistry, Message, MessageStore,
    RoomDirectory, RoomKey,
};
use std::collections::BTreeSet;

/// Presence and routing state machine
#[derive(Debug)]
pub struct Hub {
    registry: IdentityRegistry,
    directory: RoomDirectory,
    store: MessageStore,
    /// Every live connection, joined or not; presence snapshots go to all of them
    connections: BTreeSet<ConnectionId>,
}

impl Default for Hub {
    fn default() -> Self {
        Self::new(HistoryLimits::default())
    }
}

impl Hub {
    /// Create a hub holding only the General channel
    #[must_use]
    pub fn new(limits: HistoryLimits) -> Self {
        let mut store = MessageStore::new(limits);
        store.ensure_room(&RoomKey::general());

        Self {
            registry: IdentityRegistry::new(),
            directory: RoomDirectory::new(),
            store,
            connections: BTreeSet::new(),
        }
    }

    /// Track a freshly accepted connection
    pub fn connect(&mut self, connection_id: ConnectionId) {
        tracing::debug!(connection_id = %connection_id, "Connection entered hub");
        self.connections.insert(connection_id);
    }

    /// Apply one client event
    ///
    /// Domain failures become replies to `from` only; nothing is ever broadcast for them.
    pub fn handle(&mut self, from: &ConnectionId, event: ClientEvent) -> Outbox {
        let name = event.name();

        let result = match event {
            ClientEvent::Join(username) => self.join(from, &username),
            ClientEvent::UpdateAvatar(url) => self.update_avatar(from, url),
            ClientEvent::SendMessage(payload) => self.send_message(from, payload),
            ClientEvent::JoinChannel(payload) => {
                self.join_channel(from, &payload.name, payload.password.as_deref())
            }
            ClientEvent::CreateChannel(payload) => {
                self.create_channel(from, &payload.name, payload.password)
            }
            ClientEvent::JoinPrivate(other) => self.join_private(from, &other),
            ClientEvent::CallUser(payload) => self.call_user(from, payload),
            ClientEvent::AnswerCall(payload) => self.answer_call(from, payload),
            ClientEvent::RejectCall(payload) | ClientEvent::EndCall(payload) => {
                self.end_call(from, &payload)
            }
        };

        result.unwrap_or_else(|err| Self::reject(from, name, &err))
    }

    /// Reply to the originating connection for a refused event
    fn reject(from: &ConnectionId, event: &'static str, err: &DomainError) -> Outbox {
        match err {
            DomainError::SenderUnknown => {
                tracing::warn!(connection_id = %from, event, "Event from unregistered connection dropped");
                Outbox::new()
            }
            DomainError::RecipientOffline(username) => {
                tracing::debug!(connection_id = %from, event, recipient = %username, "Recipient offline");
                Outbox::single(
                    from.clone(),
                    ServerEvent::ReceiveMessage(private_notice(err.to_string(), username)),
                )
            }
            DomainError::NotAMember(room) => {
                tracing::debug!(connection_id = %from, event, room = %room, "Send outside membership refused");
                Outbox::single(
                    from.clone(),
                    ServerEvent::ReceiveMessage(Message::system(err.to_string(), room.as_str())),
                )
            }
            _ => {
                tracing::debug!(connection_id = %from, event, code = err.code(), "Request refused");
                Outbox::single(from.clone(), ServerEvent::JoinFail(err.to_string()))
            }
        }
    }

    // === Accessors ===

    pub fn registry(&self) -> &IdentityRegistry {
        &self.registry
    }

    pub fn directory(&self) -> &RoomDirectory {
        &self.directory
    }

    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    pub fn is_connected(&self, connection_id: &ConnectionId) -> bool {
        self.connections.contains(connection_id)
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}

/// Never-stored system notice shown in the private conversation with `username`
fn private_notice(content: String, username: &str) -> Message {
    let mut notice = Message::system(content, username);
    notice.is_private = true;
    notice
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::UserEntry;
    use crate::protocol::{ChannelRequestPayload, SendMessagePayload};
    use messenger_core::MessageKind;

    pub(super) fn conn(id: &str) -> ConnectionId {
        ConnectionId::new(id)
    }

    /// Hub with each `(connection, username)` connected and joined
    pub(super) fn hub_with(users: &[(&str, &str)]) -> Hub {
        let mut hub = Hub::default();
        for (id, name) in users {
            hub.connect(conn(id));
            hub.handle(&conn(id), ClientEvent::Join((*name).to_string()));
        }
        hub
    }

    pub(super) fn say(room: &str, content: &str) -> ClientEvent {
        ClientEvent::SendMessage(SendMessagePayload {
            room: room.to_string(),
            is_private: false,
            kind: MessageKind::Text,
            content: content.to_string(),
        })
    }

    pub(super) fn whisper(to: &str, content: &str) -> ClientEvent {
        ClientEvent::SendMessage(SendMessagePayload {
            room: to.to_string(),
            is_private: true,
            kind: MessageKind::Text,
            content: content.to_string(),
        })
    }

    pub(super) fn channel(name: &str, password: Option<&str>) -> ChannelRequestPayload {
        ChannelRequestPayload {
            name: name.to_string(),
            password: password.map(str::to_string),
        }
    }

    pub(super) fn received<'a>(outbox: &'a Outbox, to: &ConnectionId) -> Vec<&'a Message> {
        outbox
            .events_for(to)
            .filter_map(ServerEvent::as_message)
            .collect()
    }

    #[test]
    fn test_new_hub_has_general_only() {
        let hub = Hub::default();
        assert_eq!(hub.directory().channel_count(), 1);
        assert!(hub.store().has_room(&RoomKey::general()));
        assert_eq!(hub.connection_count(), 0);
    }

    #[test]
    fn test_unregistered_events_are_silent() {
        let mut hub = Hub::default();
        hub.connect(conn("c1"));

        for event in [
            say("General", "hi"),
            ClientEvent::UpdateAvatar("x.png".to_string()),
            ClientEvent::JoinPrivate("bob".to_string()),
            ClientEvent::JoinChannel(channel("General", None)),
            ClientEvent::CreateChannel(channel("dev", None)),
        ] {
            assert!(hub.handle(&conn("c1"), event).is_empty());
        }
        assert_eq!(hub.directory().channel_count(), 1);
        assert!(hub.store().is_empty(&RoomKey::general()));
    }

    #[test]
    fn test_failures_reach_only_the_sender() {
        let mut hub = hub_with(&[("c1", "alice"), ("c2", "bob")]);

        let outbox = hub.handle(&conn("c2"), ClientEvent::Join("alice".to_string()));
        assert_eq!(outbox.len(), 1);
        assert_eq!(
            outbox.events_for(&conn("c2")).next(),
            Some(&ServerEvent::JoinFail(
                "Username 'alice' is already taken.".to_string()
            ))
        );

        let outbox = hub.handle(
            &conn("c2"),
            ClientEvent::JoinChannel(channel("nowhere", None)),
        );
        assert_eq!(outbox.len(), 1);
        assert_eq!(
            outbox.events_for(&conn("c2")).next(),
            Some(&ServerEvent::JoinFail("Channel 'nowhere' does not exist.".to_string()))
        );
    }

    #[test]
    fn test_presence_snapshot_reaches_unjoined_connections() {
        let mut hub = Hub::default();
        hub.connect(conn("watcher"));
        hub.connect(conn("c1"));

        let outbox = hub.handle(&conn("c1"), ClientEvent::Join("alice".to_string()));

        let users = outbox
            .events_for(&conn("watcher"))
            .find_map(|event| match event {
                ServerEvent::UpdateUserList(users) => Some(users.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(
            users.get(&conn("c1")).map(|u: &UserEntry| u.username.as_str()),
            Some("alice")
        );
    }
}
