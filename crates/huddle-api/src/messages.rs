use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use huddle_core::Core;
use huddle_types::api::{
    EditMessageRequest, ListMessagesQuery, ScheduleSendRequest, SearchQuery, SearchResponse,
    SendMessageRequest, SendMessageResponse, ShareMessageRequest, ShareMessageResponse,
};
use huddle_types::models::{ChannelId, ContainerRef, DmId, MessageId};

use crate::error::ApiError;
use crate::extract::Bearer;

// -- Send --

pub async fn send_to_channel(
    State(core): State<Core>,
    Path(channel_id): Path<u64>,
    Bearer(token): Bearer,
    Json(req): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    send(core, token, ContainerRef::Channel(ChannelId(channel_id)), req).await
}

pub async fn send_to_dm(
    State(core): State<Core>,
    Path(dm_id): Path<u64>,
    Bearer(token): Bearer,
    Json(req): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    send(core, token, ContainerRef::Dm(DmId(dm_id)), req).await
}

async fn send(
    core: Core,
    token: String,
    container: ContainerRef,
    req: SendMessageRequest,
) -> Result<impl IntoResponse, ApiError> {
    let message_id = core.send(&token, container, &req.body).await?;
    Ok((StatusCode::CREATED, Json(SendMessageResponse { message_id })))
}

// -- List --

pub async fn list_channel(
    State(core): State<Core>,
    Path(channel_id): Path<u64>,
    Query(query): Query<ListMessagesQuery>,
    Bearer(token): Bearer,
) -> Result<impl IntoResponse, ApiError> {
    let page = core
        .list_messages(&token, ContainerRef::Channel(ChannelId(channel_id)), query.start)
        .await?;
    Ok(Json(page))
}

pub async fn list_dm(
    State(core): State<Core>,
    Path(dm_id): Path<u64>,
    Query(query): Query<ListMessagesQuery>,
    Bearer(token): Bearer,
) -> Result<impl IntoResponse, ApiError> {
    let page = core
        .list_messages(&token, ContainerRef::Dm(DmId(dm_id)), query.start)
        .await?;
    Ok(Json(page))
}

// -- Edit / remove --

pub async fn edit(
    State(core): State<Core>,
    Path(message_id): Path<u64>,
    Bearer(token): Bearer,
    Json(req): Json<EditMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    core.edit(&token, MessageId(message_id), &req.body).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove(
    State(core): State<Core>,
    Path(message_id): Path<u64>,
    Bearer(token): Bearer,
) -> Result<impl IntoResponse, ApiError> {
    core.remove(&token, MessageId(message_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// -- Share --

pub async fn share(
    State(core): State<Core>,
    Bearer(token): Bearer,
    Json(req): Json<ShareMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let dest = ContainerRef::from_pair(req.channel_id, req.dm_id)
        .ok_or_else(|| ApiError::bad_request("exactly one destination must be set"))?;
    let shared_message_id = core
        .share(&token, req.og_message_id, &req.message, dest)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ShareMessageResponse { shared_message_id }),
    ))
}

// -- Search --

pub async fn search(
    State(core): State<Core>,
    Query(query): Query<SearchQuery>,
    Bearer(token): Bearer,
) -> Result<impl IntoResponse, ApiError> {
    let messages = core.search_messages(&token, &query.query).await?;
    Ok(Json(SearchResponse { messages }))
}

// -- Scheduled sends --

pub async fn schedule_to_channel(
    State(core): State<Core>,
    Path(channel_id): Path<u64>,
    Bearer(token): Bearer,
    Json(req): Json<ScheduleSendRequest>,
) -> Result<impl IntoResponse, ApiError> {
    schedule(core, token, ContainerRef::Channel(ChannelId(channel_id)), req).await
}

pub async fn schedule_to_dm(
    State(core): State<Core>,
    Path(dm_id): Path<u64>,
    Bearer(token): Bearer,
    Json(req): Json<ScheduleSendRequest>,
) -> Result<impl IntoResponse, ApiError> {
    schedule(core, token, ContainerRef::Dm(DmId(dm_id)), req).await
}

async fn schedule(
    core: Core,
    token: String,
    container: ContainerRef,
    req: ScheduleSendRequest,
) -> Result<impl IntoResponse, ApiError> {
    let message_id = core
        .schedule_send(&token, container, &req.body, req.fire_at)
        .await?;
    Ok((StatusCode::CREATED, Json(SendMessageResponse { message_id })))
}
