//! Identity registry
//!
//! Binds live connections to participants and keeps usernames unique.

use std::collections::HashMap;

use crate::entities::{validate_username, Participant};
use crate::error::DomainError;
use crate::value_objects::ConnectionId;

/// Result of a successful `join`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    /// A fresh participant was registered
    Registered,
    /// The connection re-sent its current name; nothing changed
    Rejoined,
    /// The connection switched to a new name; the previous one was released
    Renamed { previous: String },
}

/// Connection ↔ username bindings
#[derive(Debug, Default)]
pub struct IdentityRegistry {
    by_connection: HashMap<ConnectionId, Participant>,
    by_name: HashMap<String, ConnectionId>,
}

impl IdentityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `username` to `connection_id`
    ///
    /// Fails with `NameTaken` if another live connection holds the name.
    pub fn join(
        &mut self,
        connection_id: &ConnectionId,
        username: &str,
    ) -> Result<JoinOutcome, DomainError> {
        validate_username(username)?;

        if let Some(holder) = self.by_name.get(username) {
            if holder == connection_id {
                return Ok(JoinOutcome::Rejoined);
            }
            return Err(DomainError::NameTaken(username.to_string()));
        }

        let outcome = match self.by_connection.get_mut(connection_id) {
            Some(existing) => {
                let previous = std::mem::replace(&mut existing.username, username.to_string());
                existing.avatar = Participant::default_avatar_url(username);
                self.by_name.remove(&previous);
                JoinOutcome::Renamed { previous }
            }
            None => {
                self.by_connection.insert(
                    connection_id.clone(),
                    Participant::new(connection_id.clone(), username),
                );
                JoinOutcome::Registered
            }
        };

        self.by_name
            .insert(username.to_string(), connection_id.clone());

        Ok(outcome)
    }

    /// Replace the avatar of a registered participant
    pub fn update_avatar(
        &mut self,
        connection_id: &ConnectionId,
        avatar: impl Into<String>,
    ) -> Result<&Participant, DomainError> {
        let participant = self
            .by_connection
            .get_mut(connection_id)
            .ok_or(DomainError::SenderUnknown)?;
        participant.avatar = avatar.into();
        Ok(participant)
    }

    /// Remove a connection's binding, freeing its username
    pub fn remove(&mut self, connection_id: &ConnectionId) -> Option<Participant> {
        let participant = self.by_connection.remove(connection_id)?;
        self.by_name.remove(&participant.username);
        Some(participant)
    }

    /// Participant bound to a connection
    pub fn get(&self, connection_id: &ConnectionId) -> Option<&Participant> {
        self.by_connection.get(connection_id)
    }

    /// Participant bound to a connection, or `SenderUnknown`
    pub fn require(&self, connection_id: &ConnectionId) -> Result<&Participant, DomainError> {
        self.get(connection_id).ok_or(DomainError::SenderUnknown)
    }

    /// Live connection currently holding `username`
    pub fn connection_of(&self, username: &str) -> Option<&ConnectionId> {
        self.by_name.get(username)
    }

    pub fn is_online(&self, username: &str) -> bool {
        self.by_name.contains_key(username)
    }

    /// All registered participants, in no particular order
    pub fn participants(&self) -> impl Iterator<Item = &Participant> {
        self.by_connection.values()
    }

    pub fn len(&self) -> usize {
        self.by_connection.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_connection.is_empty()
    }
}
