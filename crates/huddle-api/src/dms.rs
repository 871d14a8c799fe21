use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use huddle_core::Core;
use huddle_types::api::{CreateDmRequest, CreateDmResponse};
use huddle_types::models::DmId;

use crate::error::ApiError;
use crate::extract::Bearer;

pub async fn create(
    State(core): State<Core>,
    Bearer(token): Bearer,
    Json(req): Json<CreateDmRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let dm_id = core.create_dm(&token, &req.invitee_ids).await?;
    Ok((StatusCode::CREATED, Json(CreateDmResponse { dm_id })))
}

pub async fn leave(
    State(core): State<Core>,
    Path(dm_id): Path<u64>,
    Bearer(token): Bearer,
) -> Result<impl IntoResponse, ApiError> {
    core.leave_dm(&token, DmId(dm_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove(
    State(core): State<Core>,
    Path(dm_id): Path<u64>,
    Bearer(token): Bearer,
) -> Result<impl IntoResponse, ApiError> {
    core.remove_dm(&token, DmId(dm_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
