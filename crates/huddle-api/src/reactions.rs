use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use huddle_core::Core;
use huddle_types::api::ReactRequest;
use huddle_types::models::{MessageId, ReactionKind};

use crate::error::ApiError;
use crate::extract::Bearer;

fn parse_kind(code: u32) -> Result<ReactionKind, ApiError> {
    ReactionKind::from_code(code).ok_or_else(|| ApiError::bad_request("unknown reaction code"))
}

pub async fn react(
    State(core): State<Core>,
    Path(message_id): Path<u64>,
    Bearer(token): Bearer,
    Json(req): Json<ReactRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let kind = parse_kind(req.react_code)?;
    core.react(&token, MessageId(message_id), kind).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn unreact(
    State(core): State<Core>,
    Path(message_id): Path<u64>,
    Bearer(token): Bearer,
    Json(req): Json<ReactRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let kind = parse_kind(req.react_code)?;
    core.unreact(&token, MessageId(message_id), kind).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn pin(
    State(core): State<Core>,
    Path(message_id): Path<u64>,
    Bearer(token): Bearer,
) -> Result<impl IntoResponse, ApiError> {
    core.pin(&token, MessageId(message_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn unpin(
    State(core): State<Core>,
    Path(message_id): Path<u64>,
    Bearer(token): Bearer,
) -> Result<impl IntoResponse, ApiError> {
    core.unpin(&token, MessageId(message_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
