use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

id_type!(UserId);
id_type!(ChannelId);
id_type!(DmId);
id_type!(
    /// Globally unique across all containers and strictly increasing in
    /// allocation order, regardless of which path (send, share, standup,
    /// scheduled send) allocated it.
    MessageId
);

/// Points at the container a message or notification belongs to: exactly one
/// of a channel or a DM thread.
///
/// The wire shape stays the `{channel_id, dm_id}` pair with `-1` sentinels
/// (see [`ContainerRef::from_pair`]); internally we keep a proper variant so
/// the "both set" / "neither set" states are unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainerRef {
    Channel(ChannelId),
    Dm(DmId),
}

impl ContainerRef {
    /// Translate the sentinel pair into a ref. Returns `None` unless exactly
    /// one side is a real id and the other is `-1`.
    pub fn from_pair(channel_id: i64, dm_id: i64) -> Option<Self> {
        match (channel_id, dm_id) {
            (c, -1) if c >= 0 => Some(Self::Channel(ChannelId(c as u64))),
            (-1, d) if d >= 0 => Some(Self::Dm(DmId(d as u64))),
            _ => None,
        }
    }

    pub fn channel_id(&self) -> i64 {
        match self {
            Self::Channel(id) => id.0 as i64,
            Self::Dm(_) => -1,
        }
    }

    pub fn dm_id(&self) -> i64 {
        match self {
            Self::Dm(id) => id.0 as i64,
            Self::Channel(_) => -1,
        }
    }
}

impl fmt::Display for ContainerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Channel(id) => write!(f, "channel {id}"),
            Self::Dm(id) => write!(f, "dm {id}"),
        }
    }
}

/// The closed set of reaction kinds, identified on the wire by numeric codes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u32", into = "u32")]
pub enum ReactionKind {
    ThumbsUp,
    Heart,
    Celebrate,
}

impl ReactionKind {
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            1 => Some(Self::ThumbsUp),
            2 => Some(Self::Heart),
            3 => Some(Self::Celebrate),
            _ => None,
        }
    }

    pub fn code(self) -> u32 {
        match self {
            Self::ThumbsUp => 1,
            Self::Heart => 2,
            Self::Celebrate => 3,
        }
    }
}

impl TryFrom<u32> for ReactionKind {
    type Error = String;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or_else(|| format!("unknown reaction code {code}"))
    }
}

impl From<ReactionKind> for u32 {
    fn from(kind: ReactionKind) -> u32 {
        kind.code()
    }
}

/// A message as stored in its container.
///
/// `tagged_users` is the durable record of everyone ever notified of a
/// mention in this message. It is checked and appended to across edits,
/// never cleared, which is what suppresses repeat notifications when an edit
/// mentions the same handle again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub author_id: UserId,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    pub pinned: bool,
    pub reactions: BTreeMap<ReactionKind, BTreeSet<UserId>>,
    pub tagged_users: BTreeSet<UserId>,
}

/// One entry in a user's notification feed. Immutable once created; exactly
/// one of `channel_id` / `dm_id` is a real id, the other is `-1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub channel_id: i64,
    pub dm_id: i64,
    pub message: String,
}

impl Notification {
    pub fn new(container: ContainerRef, message: String) -> Self {
        Self {
            channel_id: container.channel_id(),
            dm_id: container.dm_id(),
            message,
        }
    }
}
