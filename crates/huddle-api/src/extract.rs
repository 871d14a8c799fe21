use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;

use huddle_core::CoreError;

use crate::error::ApiError;

/// The opaque session token from the `Authorization: Bearer ...` header.
/// Token validation itself happens in the core; this only peels the header.
pub struct Bearer(pub String);

impl<S> FromRequestParts<S> for Bearer
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(|token| Bearer(token.to_string()))
            .ok_or(ApiError(CoreError::Unauthorized))
    }
}
