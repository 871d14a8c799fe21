use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use huddle_core::Core;
use huddle_types::api::{
    CreateChannelRequest, CreateChannelResponse, InviteRequest, StandupActiveResponse,
    StandupSendRequest, StandupStartRequest, StandupStartResponse,
};
use huddle_types::models::ChannelId;

use crate::error::ApiError;
use crate::extract::Bearer;

pub async fn create(
    State(core): State<Core>,
    Bearer(token): Bearer,
    Json(req): Json<CreateChannelRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let channel_id = core.create_channel(&token, &req.name, req.is_public).await?;
    Ok((StatusCode::CREATED, Json(CreateChannelResponse { channel_id })))
}

pub async fn join(
    State(core): State<Core>,
    Path(channel_id): Path<u64>,
    Bearer(token): Bearer,
) -> Result<impl IntoResponse, ApiError> {
    core.join_channel(&token, ChannelId(channel_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn invite(
    State(core): State<Core>,
    Path(channel_id): Path<u64>,
    Bearer(token): Bearer,
    Json(req): Json<InviteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    core.invite_to_channel(&token, ChannelId(channel_id), req.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn leave(
    State(core): State<Core>,
    Path(channel_id): Path<u64>,
    Bearer(token): Bearer,
) -> Result<impl IntoResponse, ApiError> {
    core.leave_channel(&token, ChannelId(channel_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// -- Standups --

pub async fn standup_start(
    State(core): State<Core>,
    Path(channel_id): Path<u64>,
    Bearer(token): Bearer,
    Json(req): Json<StandupStartRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let finish_at = core
        .standup_start(&token, ChannelId(channel_id), req.length_secs)
        .await?;
    Ok(Json(StandupStartResponse { finish_at }))
}

pub async fn standup_active(
    State(core): State<Core>,
    Path(channel_id): Path<u64>,
    Bearer(token): Bearer,
) -> Result<impl IntoResponse, ApiError> {
    let (is_active, finish_at) = core.standup_active(&token, ChannelId(channel_id)).await?;
    Ok(Json(StandupActiveResponse { is_active, finish_at }))
}

pub async fn standup_send(
    State(core): State<Core>,
    Path(channel_id): Path<u64>,
    Bearer(token): Bearer,
    Json(req): Json<StandupSendRequest>,
) -> Result<impl IntoResponse, ApiError> {
    core.standup_send(&token, ChannelId(channel_id), &req.message)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
