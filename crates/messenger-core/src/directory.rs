//! Room directory
//!
//! Channel definitions plus the room assignment of every joined connection.
//! A connection has one current room and any number of attached private rooms;
//! the `members` index is kept in step with those assignments so fan-out never
//! scans every connection.

use std::collections::{BTreeSet, HashMap};

use crate::entities::{validate_channel_name, Channel, ChannelSummary};
use crate::error::DomainError;
use crate::value_objects::{ConnectionId, RoomKey};

/// Room assignment of a single connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    /// Room chosen by the last explicit join
    pub current: RoomKey,
    /// Private rooms joined implicitly, alongside `current`
    pub attached: BTreeSet<RoomKey>,
}

impl Membership {
    fn new(current: RoomKey) -> Self {
        Self {
            current,
            attached: BTreeSet::new(),
        }
    }

    /// Every room this connection receives broadcasts for
    pub fn rooms(&self) -> impl Iterator<Item = &RoomKey> {
        std::iter::once(&self.current).chain(self.attached.iter())
    }

    pub fn contains(&self, room: &RoomKey) -> bool {
        self.current == *room || self.attached.contains(room)
    }
}

/// Channels and room membership
#[derive(Debug)]
pub struct RoomDirectory {
    channels: HashMap<String, Channel>,
    /// Channel names in creation order, General first
    order: Vec<String>,
    memberships: HashMap<ConnectionId, Membership>,
    members: HashMap<RoomKey, BTreeSet<ConnectionId>>,
}

impl Default for RoomDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl RoomDirectory {
    /// Directory holding only the General channel
    pub fn new() -> Self {
        let general = Channel::general();
        let mut directory = Self {
            channels: HashMap::new(),
            order: Vec::new(),
            memberships: HashMap::new(),
            members: HashMap::new(),
        };
        directory.order.push(general.name.clone());
        directory.channels.insert(general.name.clone(), general);
        directory
    }

    /// Define a new channel
    pub fn create_channel(
        &mut self,
        name: &str,
        password: Option<String>,
    ) -> Result<RoomKey, DomainError> {
        validate_channel_name(name)?;
        if self.channels.contains_key(name) {
            return Err(DomainError::ChannelAlreadyExists(name.to_string()));
        }

        let channel = Channel::new(name, password);
        tracing::debug!(channel = %name, protected = channel.is_protected(), "Channel created");
        self.order.push(name.to_string());
        self.channels.insert(name.to_string(), channel);
        Ok(RoomKey::channel(name))
    }

    pub fn channel(&self, name: &str) -> Option<&Channel> {
        self.channels.get(name)
    }

    /// Resolve a channel name and check the supplied password
    pub fn authorize(&self, name: &str, password: Option<&str>) -> Result<RoomKey, DomainError> {
        let channel = self
            .channels
            .get(name)
            .ok_or_else(|| DomainError::ChannelNotFound(name.to_string()))?;
        if !channel.accepts(password) {
            return Err(DomainError::WrongPassword(name.to_string()));
        }
        Ok(RoomKey::channel(name))
    }

    /// Explicit join: leave every room and make `room` the only one
    pub fn switch(&mut self, connection_id: &ConnectionId, room: RoomKey) {
        self.detach_all(connection_id);
        self.index(connection_id, &room);
        self.memberships
            .insert(connection_id.clone(), Membership::new(room));
    }

    /// Implicit join of an extra room without touching the current one
    ///
    /// Returns `false` if the connection has no room assignment yet.
    pub fn attach(&mut self, connection_id: &ConnectionId, room: &RoomKey) -> bool {
        let Some(membership) = self.memberships.get_mut(connection_id) else {
            return false;
        };
        if membership.current != *room {
            membership.attached.insert(room.clone());
        }
        self.index(connection_id, room);
        true
    }

    /// Remove the connection from every room
    pub fn detach_all(&mut self, connection_id: &ConnectionId) -> Option<Membership> {
        let membership = self.memberships.remove(connection_id)?;
        for room in membership.rooms() {
            self.unindex(connection_id, room);
        }
        Some(membership)
    }

    pub fn membership(&self, connection_id: &ConnectionId) -> Option<&Membership> {
        self.memberships.get(connection_id)
    }

    pub fn current_room(&self, connection_id: &ConnectionId) -> Option<&RoomKey> {
        self.memberships.get(connection_id).map(|m| &m.current)
    }

    pub fn is_member(&self, connection_id: &ConnectionId, room: &RoomKey) -> bool {
        self.members
            .get(room)
            .is_some_and(|set| set.contains(connection_id))
    }

    /// Connections receiving broadcasts for `room`
    pub fn members_of(&self, room: &RoomKey) -> Vec<ConnectionId> {
        self.members
            .get(room)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn member_count(&self, room: &RoomKey) -> usize {
        self.members.get(room).map_or(0, BTreeSet::len)
    }

    /// Channel list projection in creation order
    pub fn channel_summaries(&self) -> Vec<ChannelSummary> {
        self.order
            .iter()
            .map(|name| ChannelSummary {
                name: name.clone(),
                members: self.member_count(&RoomKey::channel(name.as_str())),
            })
            .collect()
    }

    pub fn channel_count(&self) -> usize {
        self.order.len()
    }

    fn index(&mut self, connection_id: &ConnectionId, room: &RoomKey) {
        self.members
            .entry(room.clone())
            .or_default()
            .insert(connection_id.clone());
    }

    fn unindex(&mut self, connection_id: &ConnectionId, room: &RoomKey) {
        if let Some(set) = self.members.get_mut(room) {
            set.remove(connection_id);
            if set.is_empty() {
                self.members.remove(room);
            }
        }
    }
}
