//! Per-user bounded notification feeds.

use std::collections::VecDeque;

use huddle_types::models::Notification;

/// Feed capacity; inserting into a full feed evicts the oldest entry.
pub const FEED_CAPACITY: usize = 20;

/// A user's notification log: newest first, capped at [`FEED_CAPACITY`].
/// Created empty with the user, mutated only by [`NotificationFeed::push`].
#[derive(Debug, Default, Clone)]
pub struct NotificationFeed {
    entries: VecDeque<Notification>,
}

impl NotificationFeed {
    pub fn push(&mut self, notification: Notification) {
        if self.entries.len() == FEED_CAPACITY {
            self.entries.pop_back();
        }
        self.entries.push_front(notification);
    }

    /// Snapshot, newest first.
    pub fn to_vec(&self) -> Vec<Notification> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
