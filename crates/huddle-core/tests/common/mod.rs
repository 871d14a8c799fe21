#![allow(dead_code)]

use huddle_core::Core;
use huddle_types::models::{ChannelId, ContainerRef, DmId, UserId};

pub struct Session {
    pub id: UserId,
    pub token: String,
}

pub async fn register(core: &Core, handle: &str) -> Session {
    let (id, token) = core.register_user(handle).await.expect("register user");
    Session { id, token }
}

/// Public channel owned by `owner`.
pub async fn channel(core: &Core, owner: &Session, name: &str) -> ChannelId {
    core.create_channel(&owner.token, name, true)
        .await
        .expect("create channel")
}

pub async fn channel_with(
    core: &Core,
    owner: &Session,
    name: &str,
    members: &[&Session],
) -> ChannelId {
    let id = channel(core, owner, name).await;
    for member in members {
        core.join_channel(&member.token, id).await.expect("join channel");
    }
    id
}

pub async fn dm(core: &Core, owner: &Session, invitees: &[&Session]) -> DmId {
    let ids: Vec<UserId> = invitees.iter().map(|s| s.id).collect();
    core.create_dm(&owner.token, &ids).await.expect("create dm")
}

pub fn chan(id: ChannelId) -> ContainerRef {
    ContainerRef::Channel(id)
}

pub fn dm_ref(id: DmId) -> ContainerRef {
    ContainerRef::Dm(id)
}
