//! Message lifecycle: send, edit, remove, share, plus the listing and
//! search projections.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use chrono::Utc;
use tracing::debug;

use huddle_types::api::{MessageView, MessagesPage, ReactionView};
use huddle_types::models::{ContainerRef, Message, MessageId, UserId};

use crate::error::{CoreError, CoreResult};
use crate::store::{Core, Workspace};
use crate::{MAX_MESSAGE_LEN, PAGE_SIZE};

impl Core {
    /// Send a message into a container. Returns the new globally-unique id,
    /// then runs tag-and-notify over the body.
    pub async fn send(
        &self,
        token: &str,
        container: ContainerRef,
        body: &str,
    ) -> CoreResult<MessageId> {
        let mut state = self.state().await;
        let actor = state.resolve_actor(token)?;
        state.ensure_container(container)?;
        if !state.is_member(actor, container) {
            return Err(CoreError::Forbidden("not a member of this container"));
        }
        let len = body.chars().count();
        if len == 0 || len > MAX_MESSAGE_LEN {
            return Err(CoreError::BadRequest("message length out of range"));
        }

        let id = state.deliver(container, actor, body.to_string(), body);
        debug!(message = %id, %container, "sent message");
        Ok(id)
    }

    /// Replace a message's body in place: same id, same position, original
    /// timestamp. The empty string is a valid edit ("keep but blank").
    /// Tag-and-notify re-runs over the new body; `tagged_users` suppresses
    /// repeats.
    pub async fn edit(&self, token: &str, message_id: MessageId, body: &str) -> CoreResult<()> {
        let mut state = self.state().await;
        let actor = state.resolve_actor(token)?;
        let container = state.resolve_message_for(actor, message_id)?;
        if body.chars().count() > MAX_MESSAGE_LEN {
            return Err(CoreError::BadRequest("message length out of range"));
        }
        let author = state.require_author_or_owner(actor, container, message_id)?;

        let message = state
            .message_mut(container, message_id)
            .expect("message vanished mid-operation");
        message.body = body.to_string();

        state.tag_and_notify(container, message_id, author, body);
        debug!(message = %message_id, "edited message");
        Ok(())
    }

    /// Delete a message. The id is never reclaimed; notifications already
    /// issued for it stay in their feeds.
    pub async fn remove(&self, token: &str, message_id: MessageId) -> CoreResult<()> {
        let mut state = self.state().await;
        let actor = state.resolve_actor(token)?;
        let container = state.resolve_message_for(actor, message_id)?;
        state.require_author_or_owner(actor, container, message_id)?;

        let messages = state
            .messages_mut(container)
            .expect("container vanished mid-operation");
        messages.retain(|m| m.id != message_id);
        state.message_index.remove(&message_id);
        state.message_count -= 1;

        debug!(message = %message_id, "removed message");
        Ok(())
    }

    /// Share a message into another container. The new body is
    /// `original + ' ' + optional`; tag-and-notify runs over the optional
    /// text only; carried-forward content is never re-scanned.
    pub async fn share(
        &self,
        token: &str,
        og_message_id: MessageId,
        optional_body: &str,
        dest: ContainerRef,
    ) -> CoreResult<MessageId> {
        let mut state = self.state().await;
        let actor = state.resolve_actor(token)?;
        state.ensure_container(dest)?;
        let source = state.resolve_message_for(actor, og_message_id)?;

        let original = state
            .message(source, og_message_id)
            .expect("message vanished mid-operation")
            .body
            .clone();
        let composed = format!("{original} {optional_body}");
        if composed.chars().count() > MAX_MESSAGE_LEN {
            return Err(CoreError::BadRequest("shared message too long"));
        }
        if !state.is_member(actor, dest) {
            return Err(CoreError::Forbidden("not a member of the destination"));
        }

        let id = state.deliver(dest, actor, composed, optional_body);
        debug!(message = %id, source = %og_message_id, "shared message");
        Ok(id)
    }

    /// One page of a container's messages, newest first, projected for the
    /// requesting viewer.
    pub async fn list_messages(
        &self,
        token: &str,
        container: ContainerRef,
        start: usize,
    ) -> CoreResult<MessagesPage> {
        let state = self.state().await;
        let actor = state.resolve_actor(token)?;
        state.ensure_container(container)?;
        if !state.is_member(actor, container) {
            return Err(CoreError::Forbidden("not a member of this container"));
        }

        let messages = state
            .messages(container)
            .expect("container vanished mid-operation");
        if start > messages.len() {
            return Err(CoreError::BadRequest("start exceeds message count"));
        }

        let page: Vec<MessageView> = messages
            .iter()
            .rev()
            .skip(start)
            .take(PAGE_SIZE)
            .map(|m| view_message(m, actor))
            .collect();
        let end = if start + PAGE_SIZE >= messages.len() {
            -1
        } else {
            (start + PAGE_SIZE) as i64
        };

        Ok(MessagesPage {
            messages: page,
            start,
            end,
        })
    }

    /// Case-insensitive substring search over every container the actor
    /// belongs to, newest first.
    pub async fn search_messages(&self, token: &str, query: &str) -> CoreResult<Vec<MessageView>> {
        let state = self.state().await;
        let actor = state.resolve_actor(token)?;
        let len = query.chars().count();
        if len == 0 || len > MAX_MESSAGE_LEN {
            return Err(CoreError::BadRequest("query length out of range"));
        }
        let needle = query.to_lowercase();

        let channels = state
            .channels
            .keys()
            .map(|&id| ContainerRef::Channel(id))
            .collect::<Vec<_>>();
        let dms = state.dms.keys().map(|&id| ContainerRef::Dm(id));

        let mut hits: Vec<&Message> = Vec::new();
        for container in channels.into_iter().chain(dms) {
            if !state.is_member(actor, container) {
                continue;
            }
            let messages = state
                .messages(container)
                .expect("container vanished mid-operation");
            hits.extend(
                messages
                    .iter()
                    .filter(|m| m.body.to_lowercase().contains(&needle)),
            );
        }

        // Global ids are allocated in send order, so id order is time order.
        hits.sort_unstable_by(|a, b| b.id.cmp(&a.id));
        Ok(hits.into_iter().map(|m| view_message(m, actor)).collect())
    }
}

impl Workspace {
    /// Append a fresh message and run tag-and-notify over `scanned` (the
    /// whole body for a send, only the added text for a share). Caller has
    /// already validated everything; this step cannot fail.
    pub(crate) fn deliver(
        &mut self,
        container: ContainerRef,
        author: UserId,
        body: String,
        scanned: &str,
    ) -> MessageId {
        let id = self.alloc_message_id();
        self.deliver_reserved(container, author, body, scanned, id);
        id
    }

    /// Like [`Workspace::deliver`] but with an id reserved earlier: the
    /// scheduled-send path, where the id was returned at schedule time.
    pub(crate) fn deliver_reserved(
        &mut self,
        container: ContainerRef,
        author: UserId,
        body: String,
        scanned: &str,
        id: MessageId,
    ) {
        self.append_message(
            container,
            Message {
                id,
                author_id: author,
                body,
                sent_at: Utc::now(),
                pinned: false,
                reactions: BTreeMap::new(),
                tagged_users: BTreeSet::new(),
            },
        );
        self.tag_and_notify(container, id, author, scanned);
    }

    /// Edit/remove authorization: the actor must be the message author or a
    /// container owner. Returns the author id for the caller's use.
    pub(crate) fn require_author_or_owner(
        &self,
        actor: UserId,
        container: ContainerRef,
        message_id: MessageId,
    ) -> CoreResult<UserId> {
        let author = self
            .message(container, message_id)
            .expect("message vanished mid-operation")
            .author_id;
        if actor != author && !self.is_owner(actor, container) {
            return Err(CoreError::Forbidden(
                "only the author or a container owner may do this",
            ));
        }
        Ok(author)
    }
}

pub(crate) fn view_message(message: &Message, viewer: UserId) -> MessageView {
    MessageView {
        message_id: message.id,
        author_id: message.author_id,
        body: message.body.clone(),
        sent_at: message.sent_at,
        pinned: message.pinned,
        reactions: message
            .reactions
            .iter()
            .map(|(&kind, users)| ReactionView {
                kind,
                user_ids: users.iter().copied().collect(),
                is_this_user_reacted: users.contains(&viewer),
            })
            .collect(),
    }
}
