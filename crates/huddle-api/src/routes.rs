use axum::Router;
use axum::routing::{delete, get, post, put};

use huddle_core::Core;

use crate::{channels, dms, messages, reactions, users};

/// The full route table over a [`Core`].
pub fn router(core: Core) -> Router {
    Router::new()
        // Users
        .route("/users/register", post(users::register))
        .route("/users/notifications", get(users::notifications))
        // Channels
        .route("/channels", post(channels::create))
        .route("/channels/{channel_id}/join", post(channels::join))
        .route("/channels/{channel_id}/invite", post(channels::invite))
        .route("/channels/{channel_id}/leave", post(channels::leave))
        .route("/channels/{channel_id}/messages", get(messages::list_channel))
        .route("/channels/{channel_id}/messages", post(messages::send_to_channel))
        .route(
            "/channels/{channel_id}/messages/schedule",
            post(messages::schedule_to_channel),
        )
        .route("/channels/{channel_id}/standup", get(channels::standup_active))
        .route(
            "/channels/{channel_id}/standup/start",
            post(channels::standup_start),
        )
        .route(
            "/channels/{channel_id}/standup/send",
            post(channels::standup_send),
        )
        // DMs
        .route("/dms", post(dms::create))
        .route("/dms/{dm_id}", delete(dms::remove))
        .route("/dms/{dm_id}/leave", post(dms::leave))
        .route("/dms/{dm_id}/messages", get(messages::list_dm))
        .route("/dms/{dm_id}/messages", post(messages::send_to_dm))
        .route("/dms/{dm_id}/messages/schedule", post(messages::schedule_to_dm))
        // Messages
        .route("/messages/share", post(messages::share))
        .route("/messages/search", get(messages::search))
        .route("/messages/{message_id}", put(messages::edit))
        .route("/messages/{message_id}", delete(messages::remove))
        .route("/messages/{message_id}/react", post(reactions::react))
        .route("/messages/{message_id}/unreact", post(reactions::unreact))
        .route("/messages/{message_id}/pin", post(reactions::pin))
        .route("/messages/{message_id}/unpin", post(reactions::unpin))
        .with_state(core)
}
