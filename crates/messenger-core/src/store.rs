//! Message store
//!
//! Per-room bounded history. Each room keeps its most recent messages in arrival order;
//! once a buffer exceeds its bound the oldest entries are dropped first.

use std::collections::{HashMap, VecDeque};

use crate::entities::Message;
use crate::value_objects::RoomKey;

/// History bounds per room kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryLimits {
    /// Bound for channels, General included
    pub channel: usize,
    /// Bound for private rooms
    pub private: usize,
}

impl Default for HistoryLimits {
    fn default() -> Self {
        Self {
            channel: 200,
            private: 50,
        }
    }
}

/// Bounded per-room message history
#[derive(Debug, Default)]
pub struct MessageStore {
    limits: HistoryLimits,
    rooms: HashMap<RoomKey, VecDeque<Message>>,
}

impl MessageStore {
    pub fn new(limits: HistoryLimits) -> Self {
        Self {
            limits,
            rooms: HashMap::new(),
        }
    }

    /// Bound that applies to `room`
    pub fn bound_for(&self, room: &RoomKey) -> usize {
        if room.is_private() {
            self.limits.private
        } else {
            self.limits.channel
        }
    }

    /// Create an empty buffer for a room if it has none
    pub fn ensure_room(&mut self, room: &RoomKey) {
        self.rooms.entry(room.clone()).or_default();
    }

    /// Append a message, evicting from the front past the bound
    ///
    /// Returns the number of evicted messages.
    pub fn append(&mut self, room: &RoomKey, message: Message) -> usize {
        let bound = self.bound_for(room);
        let buffer = self.rooms.entry(room.clone()).or_default();
        buffer.push_back(message);

        let mut evicted = 0;
        while buffer.len() > bound {
            buffer.pop_front();
            evicted += 1;
        }

        if evicted > 0 {
            tracing::trace!(room = %room, evicted, "History trimmed");
        }

        evicted
    }

    /// The last `n` messages in chronological order
    pub fn recent(&self, room: &RoomKey, n: usize) -> Vec<Message> {
        self.rooms
            .get(room)
            .map(|buffer| {
                let skip = buffer.len().saturating_sub(n);
                buffer.iter().skip(skip).cloned().collect()
            })
            .unwrap_or_default()
    }

    /// Add `username` to the read set of the last `n` messages
    ///
    /// Returns how many messages were newly marked.
    pub fn mark_read(&mut self, room: &RoomKey, n: usize, username: &str) -> usize {
        let Some(buffer) = self.rooms.get_mut(room) else {
            return 0;
        };
        let skip = buffer.len().saturating_sub(n);
        buffer
            .iter_mut()
            .skip(skip)
            .map(|m| m.mark_read(username))
            .filter(|&newly_marked| newly_marked)
            .count()
    }

    /// Mark the last `n` messages read by `username` and return them
    pub fn deliver_history(&mut self, room: &RoomKey, n: usize, username: &str) -> Vec<Message> {
        self.mark_read(room, n, username);
        self.recent(room, n)
    }

    /// Number of messages stored for a room
    pub fn len(&self, room: &RoomKey) -> usize {
        self.rooms.get(room).map_or(0, VecDeque::len)
    }

    /// Whether a room has any history
    pub fn is_empty(&self, room: &RoomKey) -> bool {
        self.len(room) == 0
    }

    /// Whether a buffer exists for the room
    pub fn has_room(&self, room: &RoomKey) -> bool {
        self.rooms.contains_key(room)
    }

    /// Number of rooms with a buffer
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
