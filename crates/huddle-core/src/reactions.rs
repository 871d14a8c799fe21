//! Reactions and pins.

use tracing::debug;

use huddle_types::models::{MessageId, Notification, ReactionKind};

use crate::error::{CoreError, CoreResult};
use crate::store::Core;

impl Core {
    /// Add the actor to a reaction's user set. The message author gets one
    /// feed entry, unless they reacted to their own message.
    pub async fn react(
        &self,
        token: &str,
        message_id: MessageId,
        kind: ReactionKind,
    ) -> CoreResult<()> {
        let mut state = self.state().await;
        let actor = state.resolve_actor(token)?;
        let container = state.resolve_message_for(actor, message_id)?;

        let message = state
            .message_mut(container, message_id)
            .expect("message vanished mid-operation");
        let author = message.author_id;
        if !message.reactions.entry(kind).or_default().insert(actor) {
            return Err(CoreError::BadRequest("already reacted with this kind"));
        }

        // Author still has to be around (and a member) to hear about it.
        if author != actor && state.is_member(author, container) {
            let text = format!(
                "{} reacted to your message in {}",
                state.handle_of(actor).expect("session points at missing user"),
                state
                    .container_name(container)
                    .expect("container vanished mid-operation"),
            );
            state.push_notification(author, Notification::new(container, text));
        }

        debug!(message = %message_id, ?kind, "reacted");
        Ok(())
    }

    /// Remove the actor from a reaction's user set. Does not retract the
    /// notification the react produced.
    pub async fn unreact(
        &self,
        token: &str,
        message_id: MessageId,
        kind: ReactionKind,
    ) -> CoreResult<()> {
        let mut state = self.state().await;
        let actor = state.resolve_actor(token)?;
        let container = state.resolve_message_for(actor, message_id)?;

        let message = state
            .message_mut(container, message_id)
            .expect("message vanished mid-operation");
        let removed = message
            .reactions
            .get_mut(&kind)
            .is_some_and(|users| users.remove(&actor));
        if !removed {
            return Err(CoreError::BadRequest("not currently reacted with this kind"));
        }
        if message.reactions.get(&kind).is_some_and(|users| users.is_empty()) {
            message.reactions.remove(&kind);
        }

        debug!(message = %message_id, ?kind, "unreacted");
        Ok(())
    }

    pub async fn pin(&self, token: &str, message_id: MessageId) -> CoreResult<()> {
        self.set_pinned(token, message_id, true).await
    }

    pub async fn unpin(&self, token: &str, message_id: MessageId) -> CoreResult<()> {
        self.set_pinned(token, message_id, false).await
    }

    async fn set_pinned(&self, token: &str, message_id: MessageId, pinned: bool) -> CoreResult<()> {
        let mut state = self.state().await;
        let actor = state.resolve_actor(token)?;
        let container = state.resolve_message_for(actor, message_id)?;
        if !state.is_owner(actor, container) {
            return Err(CoreError::Forbidden("pinning requires container ownership"));
        }

        let message = state
            .message_mut(container, message_id)
            .expect("message vanished mid-operation");
        if message.pinned == pinned {
            return Err(CoreError::BadRequest(if pinned {
                "already pinned"
            } else {
                "not pinned"
            }));
        }
        message.pinned = pinned;

        debug!(message = %message_id, pinned, "changed pin state");
        Ok(())
    }
}
