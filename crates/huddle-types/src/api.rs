use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{ChannelId, DmId, MessageId, Notification, ReactionKind, UserId};

// -- Users --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub handle: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: UserId,
    pub token: String,
}

// -- Channels & DMs --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateChannelRequest {
    pub name: String,
    pub is_public: bool,
}

#[derive(Debug, Serialize)]
pub struct CreateChannelResponse {
    pub channel_id: ChannelId,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InviteRequest {
    pub user_id: UserId,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateDmRequest {
    pub invitee_ids: Vec<UserId>,
}

#[derive(Debug, Serialize)]
pub struct CreateDmResponse {
    pub dm_id: DmId,
}

// -- Messages --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SendMessageRequest {
    pub body: String,
}

#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    pub message_id: MessageId,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EditMessageRequest {
    pub body: String,
}

/// Share request keeps the spec's sentinel pair: exactly one of
/// `channel_id` / `dm_id` must be a real id, the other `-1`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShareMessageRequest {
    pub og_message_id: MessageId,
    #[serde(default)]
    pub message: String,
    pub channel_id: i64,
    pub dm_id: i64,
}

#[derive(Debug, Serialize)]
pub struct ShareMessageResponse {
    pub shared_message_id: MessageId,
}

#[derive(Debug, Deserialize)]
pub struct ListMessagesQuery {
    pub start: usize,
}

/// Reactions are projected relative to the requesting viewer:
/// `is_this_user_reacted` is computed per request, not stored.
#[derive(Debug, Clone, Serialize)]
pub struct ReactionView {
    pub kind: ReactionKind,
    pub user_ids: Vec<UserId>,
    pub is_this_user_reacted: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageView {
    pub message_id: MessageId,
    pub author_id: UserId,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    pub pinned: bool,
    pub reactions: Vec<ReactionView>,
}

/// One page of a container's messages, newest first. `end` is `-1` once the
/// slice reaches the oldest message, otherwise `start + 50`.
#[derive(Debug, Serialize)]
pub struct MessagesPage {
    pub messages: Vec<MessageView>,
    pub start: usize,
    pub end: i64,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub messages: Vec<MessageView>,
}

// -- Reactions --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReactRequest {
    pub react_code: u32,
}

// -- Scheduled sends --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduleSendRequest {
    pub body: String,
    pub fire_at: DateTime<Utc>,
}

// -- Standups --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StandupStartRequest {
    pub length_secs: i64,
}

#[derive(Debug, Serialize)]
pub struct StandupStartResponse {
    pub finish_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct StandupActiveResponse {
    pub is_active: bool,
    pub finish_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StandupSendRequest {
    pub message: String,
}

// -- Notifications --

#[derive(Debug, Serialize)]
pub struct NotificationsResponse {
    pub notifications: Vec<Notification>,
}
