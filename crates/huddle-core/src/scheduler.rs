//! Deferred sends.
//!
//! `schedule_send` performs every send-time validation eagerly and hands
//! back a reserved message id, but nothing is visible (and no notification
//! exists) until the fire time. The fire is an ordinary tokio timer task
//! that re-enters the core through the same lock as interactive requests, so
//! it lands as one atomic turn. There is no cancellation; a process restart
//! silently drops pending sends.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use huddle_types::models::{ContainerRef, MessageId, UserId};

use crate::error::{CoreError, CoreResult};
use crate::store::Core;
use crate::MAX_MESSAGE_LEN;

impl Core {
    /// Validate now, deliver at `fire_at`. Works for channels and DM threads
    /// alike. Returns the reserved message id immediately.
    pub async fn schedule_send(
        &self,
        token: &str,
        container: ContainerRef,
        body: &str,
        fire_at: DateTime<Utc>,
    ) -> CoreResult<MessageId> {
        let (id, author) = {
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
            if fire_at <= Utc::now() {
                return Err(CoreError::BadRequest("fire time is not in the future"));
            }
            // Reserved now so the caller can refer to the message before it
            // exists; everything else waits for the timer.
            (state.alloc_message_id(), actor)
        };

        let delay = (fire_at - Utc::now())
            .to_std()
            .unwrap_or(Duration::ZERO);
        let core = self.clone();
        let body = body.to_string();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            core.fire_scheduled(id, author, container, body).await;
        });

        debug!(message = %id, %container, %fire_at, "scheduled send");
        Ok(id)
    }

    async fn fire_scheduled(
        &self,
        id: MessageId,
        author: UserId,
        container: ContainerRef,
        body: String,
    ) {
        let mut state = self.state().await;
        if !state.container_exists(container) {
            warn!(message = %id, %container, "dropping scheduled send: container is gone");
            return;
        }
        if !state.users.contains_key(&author) {
            warn!(message = %id, %container, "dropping scheduled send: author is gone");
            return;
        }

        state.deliver_reserved(container, author, body.clone(), &body, id);
        debug!(message = %id, %container, "scheduled send fired");
    }
}
