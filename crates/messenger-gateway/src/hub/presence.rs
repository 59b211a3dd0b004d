//! Presence projection
//!
//! Full snapshots recomputed from the registry and directory on every change.

use super::{Hub, Outbox};
use crate::events::{ServerEvent, UserEntry, UserList};

impl Hub {
    /// `updateUserList` snapshot of every registered participant
    pub fn user_list(&self) -> ServerEvent {
        let users: UserList = self
            .registry
            .participants()
            .map(|participant| (participant.connection_id.clone(), UserEntry::from(participant)))
            .collect();
        ServerEvent::UpdateUserList(users)
    }

    /// `channelList` snapshot with live member counts
    pub fn channel_list(&self) -> ServerEvent {
        ServerEvent::ChannelList(self.directory.channel_summaries())
    }

    /// Address both snapshots to every live connection
    pub(super) fn push_presence(&self, outbox: &mut Outbox) {
        outbox.broadcast(&self.connections, self.user_list());
        self.push_channel_list(outbox);
    }

    /// Address the channel list to every live connection
    pub(super) fn push_channel_list(&self, outbox: &mut Outbox) {
        outbox.broadcast(&self.connections, self.channel_list());
    }
}
