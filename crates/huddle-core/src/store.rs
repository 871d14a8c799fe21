//! The in-memory workspace store and the `Core` handle over it.
//!
//! All mutable state lives in one [`Workspace`] behind a single
//! `tokio::sync::Mutex`; every operation locks, runs to completion, and
//! unlocks. Timer callbacks (deferred sends, standup close) go through the
//! same lock, so mutations never interleave.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info};
use uuid::Uuid;

use huddle_types::models::{
    ChannelId, ContainerRef, DmId, Message, MessageId, Notification, UserId,
};

use crate::error::{CoreError, CoreResult};
use crate::feed::NotificationFeed;
use crate::standup::Standup;
use crate::tags;

const MAX_HANDLE_LEN: usize = 20;

pub(crate) struct User {
    pub id: UserId,
    pub handle: String,
    pub feed: NotificationFeed,
}

pub(crate) struct Channel {
    pub name: String,
    pub is_public: bool,
    pub owners: HashSet<UserId>,
    pub members: HashSet<UserId>,
    pub messages: Vec<Message>,
    pub standup: Standup,
}

pub(crate) struct Dm {
    pub name: String,
    /// `None` once the creator has left (a "vacated" DM).
    pub owner: Option<UserId>,
    pub members: HashSet<UserId>,
    pub messages: Vec<Message>,
}

/// All workspace state. Single writer; only ever touched with the `Core`
/// lock held.
#[derive(Default)]
pub(crate) struct Workspace {
    pub users: HashMap<UserId, User>,
    pub sessions: HashMap<String, UserId>,
    pub channels: HashMap<ChannelId, Channel>,
    pub dms: HashMap<DmId, Dm>,
    /// Every live message id, mapped to the container that owns it.
    pub message_index: HashMap<MessageId, ContainerRef>,
    next_user_id: u64,
    next_channel_id: u64,
    next_dm_id: u64,
    next_message_id: u64,
    /// Running workspace-wide message count, reported outward as deltas.
    pub message_count: i64,
}

impl Workspace {
    // -- Collaborator predicates --

    pub fn resolve_actor(&self, token: &str) -> CoreResult<UserId> {
        self.sessions
            .get(token)
            .copied()
            .ok_or(CoreError::Unauthorized)
    }

    pub fn is_member(&self, user: UserId, container: ContainerRef) -> bool {
        match container {
            ContainerRef::Channel(id) => self
                .channels
                .get(&id)
                .is_some_and(|c| c.members.contains(&user)),
            ContainerRef::Dm(id) => self.dms.get(&id).is_some_and(|d| d.members.contains(&user)),
        }
    }

    pub fn is_owner(&self, user: UserId, container: ContainerRef) -> bool {
        match container {
            ContainerRef::Channel(id) => self
                .channels
                .get(&id)
                .is_some_and(|c| c.owners.contains(&user)),
            ContainerRef::Dm(id) => self.dms.get(&id).is_some_and(|d| d.owner == Some(user)),
        }
    }

    pub fn container_exists(&self, container: ContainerRef) -> bool {
        match container {
            ContainerRef::Channel(id) => self.channels.contains_key(&id),
            ContainerRef::Dm(id) => self.dms.contains_key(&id),
        }
    }

    pub fn ensure_container(&self, container: ContainerRef) -> CoreResult<()> {
        if self.container_exists(container) {
            Ok(())
        } else {
            Err(CoreError::BadRequest("no such container"))
        }
    }

    pub fn container_name(&self, container: ContainerRef) -> Option<&str> {
        match container {
            ContainerRef::Channel(id) => self.channels.get(&id).map(|c| c.name.as_str()),
            ContainerRef::Dm(id) => self.dms.get(&id).map(|d| d.name.as_str()),
        }
    }

    pub fn handle_of(&self, user: UserId) -> Option<&str> {
        self.users.get(&user).map(|u| u.handle.as_str())
    }

    pub fn user_by_handle(&self, handle: &str) -> Option<UserId> {
        self.users
            .values()
            .find(|u| u.handle == handle)
            .map(|u| u.id)
    }

    pub fn member_handles(&self, container: ContainerRef) -> HashSet<String> {
        let members = match container {
            ContainerRef::Channel(id) => self.channels.get(&id).map(|c| &c.members),
            ContainerRef::Dm(id) => self.dms.get(&id).map(|d| &d.members),
        };
        members
            .map(|members| {
                members
                    .iter()
                    .filter_map(|id| self.handle_of(*id))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    // -- Messages --

    pub fn messages(&self, container: ContainerRef) -> Option<&Vec<Message>> {
        match container {
            ContainerRef::Channel(id) => self.channels.get(&id).map(|c| &c.messages),
            ContainerRef::Dm(id) => self.dms.get(&id).map(|d| &d.messages),
        }
    }

    pub fn messages_mut(&mut self, container: ContainerRef) -> Option<&mut Vec<Message>> {
        match container {
            ContainerRef::Channel(id) => self.channels.get_mut(&id).map(|c| &mut c.messages),
            ContainerRef::Dm(id) => self.dms.get_mut(&id).map(|d| &mut d.messages),
        }
    }

    /// Resolve a message id for an actor. Ids only resolve inside containers
    /// the actor belongs to; anything else reads as "no such message".
    pub fn resolve_message_for(
        &self,
        actor: UserId,
        message_id: MessageId,
    ) -> CoreResult<ContainerRef> {
        let container = *self
            .message_index
            .get(&message_id)
            .ok_or(CoreError::BadRequest("no such message"))?;
        if !self.is_member(actor, container) {
            return Err(CoreError::BadRequest("no such message"));
        }
        Ok(container)
    }

    pub fn message(&self, container: ContainerRef, id: MessageId) -> Option<&Message> {
        self.messages(container)
            .and_then(|msgs| msgs.iter().find(|m| m.id == id))
    }

    pub fn message_mut(&mut self, container: ContainerRef, id: MessageId) -> Option<&mut Message> {
        self.messages_mut(container)
            .and_then(|msgs| msgs.iter_mut().find(|m| m.id == id))
    }

    /// Ids are never reused, even after the message they named is removed.
    pub fn alloc_message_id(&mut self) -> MessageId {
        self.next_message_id += 1;
        MessageId(self.next_message_id)
    }

    pub fn append_message(&mut self, container: ContainerRef, message: Message) {
        self.message_index.insert(message.id, container);
        self.messages_mut(container)
            .expect("container vanished mid-operation")
            .push(message);
        self.message_count += 1;
    }

    // -- Notifications --

    pub fn push_notification(&mut self, user: UserId, notification: Notification) {
        if let Some(user) = self.users.get_mut(&user) {
            user.feed.push(notification);
        }
    }

    /// Run the tag parser over `scanned` against the destination's current
    /// member handles and notify every newly-tagged member. `tagged_users`
    /// on the message suppresses repeats across edits; it is appended to,
    /// never cleared.
    pub fn tag_and_notify(
        &mut self,
        container: ContainerRef,
        message_id: MessageId,
        author: UserId,
        scanned: &str,
    ) {
        let member_handles = self.member_handles(container);
        let Some(scan) = tags::extract_mentions(scanned, &member_handles) else {
            return;
        };
        let preview = tags::mention_preview(scanned, scan.first_at);

        let Some(author_handle) = self.handle_of(author).map(str::to_string) else {
            return;
        };
        let container_name = self
            .container_name(container)
            .expect("container vanished mid-operation")
            .to_string();
        let text = format!("{author_handle} tagged you in {container_name}: {preview}");

        for handle in &scan.handles {
            let Some(target) = self.user_by_handle(handle) else {
                continue;
            };
            let newly_tagged = self
                .message_mut(container, message_id)
                .expect("tagged message missing from its container")
                .tagged_users
                .insert(target);
            if newly_tagged {
                self.push_notification(target, Notification::new(container, text.clone()));
            }
        }
    }
}

/// Cloneable handle to the workspace. All operations lock the single inner
/// mutex for their whole duration.
#[derive(Clone, Default)]
pub struct Core {
    inner: Arc<CoreInner>,
}

#[derive(Default)]
struct CoreInner {
    state: Mutex<Workspace>,
}

impl Core {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn state(&self) -> MutexGuard<'_, Workspace> {
        self.inner.state.lock().await
    }

    // -- User / session boundary --

    /// Register a user and open a session, returning the opaque token the
    /// rest of the API authenticates with.
    pub async fn register_user(&self, handle: &str) -> CoreResult<(UserId, String)> {
        let mut state = self.state().await;

        if handle.is_empty() || handle.chars().count() > MAX_HANDLE_LEN {
            return Err(CoreError::BadRequest("handle length out of range"));
        }
        if !handle.chars().all(char::is_alphanumeric) {
            return Err(CoreError::BadRequest("handle must be alphanumeric"));
        }
        if state.user_by_handle(handle).is_some() {
            return Err(CoreError::BadRequest("handle already taken"));
        }

        state.next_user_id += 1;
        let id = UserId(state.next_user_id);
        state.users.insert(
            id,
            User {
                id,
                handle: handle.to_string(),
                feed: NotificationFeed::default(),
            },
        );

        let token = Uuid::new_v4().to_string();
        state.sessions.insert(token.clone(), id);

        info!(user = %id, handle, "registered user");
        Ok((id, token))
    }

    pub async fn get_notifications(&self, token: &str) -> CoreResult<Vec<Notification>> {
        let state = self.state().await;
        let actor = state.resolve_actor(token)?;
        let user = state.users.get(&actor).expect("session points at missing user");
        Ok(user.feed.to_vec())
    }

    /// Current workspace-wide message count.
    pub async fn message_count(&self) -> i64 {
        self.state().await.message_count
    }

    // -- Channel administration boundary --

    pub async fn create_channel(
        &self,
        token: &str,
        name: &str,
        is_public: bool,
    ) -> CoreResult<ChannelId> {
        let mut state = self.state().await;
        let actor = state.resolve_actor(token)?;

        if name.is_empty() || name.chars().count() > MAX_HANDLE_LEN {
            return Err(CoreError::BadRequest("channel name length out of range"));
        }

        state.next_channel_id += 1;
        let id = ChannelId(state.next_channel_id);
        state.channels.insert(
            id,
            Channel {
                name: name.to_string(),
                is_public,
                owners: HashSet::from([actor]),
                members: HashSet::from([actor]),
                messages: Vec::new(),
                standup: Standup::default(),
            },
        );

        info!(channel = %id, name, "created channel");
        Ok(id)
    }

    pub async fn join_channel(&self, token: &str, channel: ChannelId) -> CoreResult<()> {
        let mut state = self.state().await;
        let actor = state.resolve_actor(token)?;

        let ch = state
            .channels
            .get_mut(&channel)
            .ok_or(CoreError::BadRequest("no such channel"))?;
        if ch.members.contains(&actor) {
            return Err(CoreError::BadRequest("already a member"));
        }
        if !ch.is_public {
            return Err(CoreError::Forbidden("channel is private"));
        }
        ch.members.insert(actor);
        Ok(())
    }

    pub async fn invite_to_channel(
        &self,
        token: &str,
        channel: ChannelId,
        invitee: UserId,
    ) -> CoreResult<()> {
        let mut state = self.state().await;
        let actor = state.resolve_actor(token)?;

        if !state.users.contains_key(&invitee) {
            return Err(CoreError::BadRequest("no such user"));
        }
        let ch = state
            .channels
            .get_mut(&channel)
            .ok_or(CoreError::BadRequest("no such channel"))?;
        if !ch.members.contains(&actor) {
            return Err(CoreError::Forbidden("not a channel member"));
        }
        if !ch.members.insert(invitee) {
            return Err(CoreError::BadRequest("already a member"));
        }

        let container = ContainerRef::Channel(channel);
        let text = format!(
            "{} added you to {}",
            state.handle_of(actor).expect("session points at missing user"),
            state.container_name(container).expect("channel vanished mid-operation"),
        );
        state.push_notification(invitee, Notification::new(container, text));
        Ok(())
    }

    pub async fn leave_channel(&self, token: &str, channel: ChannelId) -> CoreResult<()> {
        let mut state = self.state().await;
        let actor = state.resolve_actor(token)?;

        let ch = state
            .channels
            .get_mut(&channel)
            .ok_or(CoreError::BadRequest("no such channel"))?;
        if !ch.members.remove(&actor) {
            return Err(CoreError::Forbidden("not a channel member"));
        }
        ch.owners.remove(&actor);
        Ok(())
    }

    // -- DM administration boundary --

    /// Create a DM between the actor and `invitees`. The DM's name is the
    /// sorted, comma-joined handle list of all members; invitees get an
    /// added-you notification.
    pub async fn create_dm(&self, token: &str, invitees: &[UserId]) -> CoreResult<DmId> {
        let mut state = self.state().await;
        let actor = state.resolve_actor(token)?;

        let mut members = HashSet::from([actor]);
        for &invitee in invitees {
            if !state.users.contains_key(&invitee) {
                return Err(CoreError::BadRequest("no such user"));
            }
            if !members.insert(invitee) {
                return Err(CoreError::BadRequest("duplicate invitee"));
            }
        }

        let mut handles: Vec<String> = members
            .iter()
            .filter_map(|&id| state.handle_of(id).map(str::to_string))
            .collect();
        handles.sort_unstable();
        let name = handles.join(", ");

        state.next_dm_id += 1;
        let id = DmId(state.next_dm_id);
        state.dms.insert(
            id,
            Dm {
                name: name.clone(),
                owner: Some(actor),
                members,
                messages: Vec::new(),
            },
        );

        let container = ContainerRef::Dm(id);
        let actor_handle = state
            .handle_of(actor)
            .expect("session points at missing user")
            .to_string();
        for &invitee in invitees {
            let text = format!("{actor_handle} added you to {name}");
            state.push_notification(invitee, Notification::new(container, text));
        }

        info!(dm = %id, name, "created dm");
        Ok(id)
    }

    /// Leave a DM. A departing creator vacates ownership.
    pub async fn leave_dm(&self, token: &str, dm: DmId) -> CoreResult<()> {
        let mut state = self.state().await;
        let actor = state.resolve_actor(token)?;

        let d = state
            .dms
            .get_mut(&dm)
            .ok_or(CoreError::BadRequest("no such dm"))?;
        if !d.members.remove(&actor) {
            return Err(CoreError::Forbidden("not a dm member"));
        }
        if d.owner == Some(actor) {
            d.owner = None;
        }
        Ok(())
    }

    /// Remove a DM entirely. Owner only; destroys every message it holds.
    pub async fn remove_dm(&self, token: &str, dm: DmId) -> CoreResult<()> {
        let mut state = self.state().await;
        let actor = state.resolve_actor(token)?;

        let d = state
            .dms
            .get(&dm)
            .ok_or(CoreError::BadRequest("no such dm"))?;
        if d.owner != Some(actor) {
            return Err(CoreError::Forbidden("only the dm creator may remove it"));
        }

        let d = state.dms.remove(&dm).expect("dm vanished mid-operation");
        let removed = d.messages.len();
        for message in &d.messages {
            state.message_index.remove(&message.id);
        }
        state.message_count -= removed as i64;

        debug!(dm = %dm, removed, "removed dm");
        Ok(())
    }
}
