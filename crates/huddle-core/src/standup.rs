//! Per-channel standups.
//!
//! A channel has at most one active standup. While active, lines sent to it
//! accumulate in a buffer as `"{handle}: {line}\n"`; when the standup ends,
//! a non-empty buffer is posted as one ordinary message from the starter
//! (tag-and-notify included) and the standup resets.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{debug, warn};

use huddle_types::models::{ChannelId, ContainerRef, UserId};

use crate::error::{CoreError, CoreResult};
use crate::store::Core;
use crate::MAX_MESSAGE_LEN;

#[derive(Debug, Default)]
pub struct Standup {
    pub active: Option<ActiveStandup>,
}

#[derive(Debug)]
pub struct ActiveStandup {
    pub starter: UserId,
    pub finish_at: DateTime<Utc>,
    pub buffer: String,
}

impl Core {
    /// Start a standup running for `length_secs` seconds. Returns the finish
    /// time.
    pub async fn standup_start(
        &self,
        token: &str,
        channel: ChannelId,
        length_secs: i64,
    ) -> CoreResult<DateTime<Utc>> {
        let finish_at = {
            let mut state = self.state().await;
            let actor = state.resolve_actor(token)?;

            if length_secs < 0 {
                return Err(CoreError::BadRequest("standup length is negative"));
            }
            let ch = state
                .channels
                .get_mut(&channel)
                .ok_or(CoreError::BadRequest("no such channel"))?;
            if !ch.members.contains(&actor) {
                return Err(CoreError::Forbidden("not a channel member"));
            }
            if ch.standup.active.is_some() {
                return Err(CoreError::BadRequest("a standup is already active"));
            }

            let finish_at = Utc::now() + TimeDelta::seconds(length_secs);
            ch.standup.active = Some(ActiveStandup {
                starter: actor,
                finish_at,
                buffer: String::new(),
            });
            finish_at
        };

        let core = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(length_secs as u64)).await;
            core.finish_standup(channel).await;
        });

        debug!(channel = %channel, %finish_at, "standup started");
        Ok(finish_at)
    }

    /// Whether a standup is running in the channel, and until when.
    pub async fn standup_active(
        &self,
        token: &str,
        channel: ChannelId,
    ) -> CoreResult<(bool, Option<DateTime<Utc>>)> {
        let state = self.state().await;
        let actor = state.resolve_actor(token)?;

        let ch = state
            .channels
            .get(&channel)
            .ok_or(CoreError::BadRequest("no such channel"))?;
        if !ch.members.contains(&actor) {
            return Err(CoreError::Forbidden("not a channel member"));
        }
        Ok(match &ch.standup.active {
            Some(active) => (true, Some(active.finish_at)),
            None => (false, None),
        })
    }

    /// Append a line to the running standup's buffer.
    pub async fn standup_send(
        &self,
        token: &str,
        channel: ChannelId,
        line: &str,
    ) -> CoreResult<()> {
        let mut state = self.state().await;
        let actor = state.resolve_actor(token)?;

        if line.chars().count() > MAX_MESSAGE_LEN {
            return Err(CoreError::BadRequest("standup line too long"));
        }
        let handle = state
            .handle_of(actor)
            .expect("session points at missing user")
            .to_string();
        let ch = state
            .channels
            .get_mut(&channel)
            .ok_or(CoreError::BadRequest("no such channel"))?;
        if !ch.members.contains(&actor) {
            return Err(CoreError::Forbidden("not a channel member"));
        }
        let Some(active) = ch.standup.active.as_mut() else {
            return Err(CoreError::BadRequest("no standup is active"));
        };

        active.buffer.push_str(&format!("{handle}: {line}\n"));
        Ok(())
    }

    async fn finish_standup(&self, channel: ChannelId) {
        let mut state = self.state().await;
        let Some(ch) = state.channels.get_mut(&channel) else {
            warn!(channel = %channel, "dropping standup close: channel is gone");
            return;
        };
        let Some(active) = ch.standup.active.take() else {
            return;
        };

        if active.buffer.is_empty() {
            debug!(channel = %channel, "standup ended with empty buffer");
            return;
        }
        if !state.users.contains_key(&active.starter) {
            warn!(channel = %channel, "dropping standup post: starter is gone");
            return;
        }

        // The accumulated buffer is exempt from the per-message length
        // bound; each line was bounded on the way in.
        let id = state.deliver(
            ContainerRef::Channel(channel),
            active.starter,
            active.buffer.clone(),
            &active.buffer,
        );
        debug!(channel = %channel, message = %id, "standup posted");
    }
}
