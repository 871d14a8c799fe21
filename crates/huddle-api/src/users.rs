use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use huddle_core::Core;
use huddle_types::api::{NotificationsResponse, RegisterRequest, RegisterResponse};

use crate::error::ApiError;
use crate::extract::Bearer;

pub async fn register(
    State(core): State<Core>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (user_id, token) = core.register_user(&req.handle).await?;
    Ok((StatusCode::CREATED, Json(RegisterResponse { user_id, token })))
}

pub async fn notifications(
    State(core): State<Core>,
    Bearer(token): Bearer,
) -> Result<impl IntoResponse, ApiError> {
    let notifications = core.get_notifications(&token).await?;
    Ok(Json(NotificationsResponse { notifications }))
}
