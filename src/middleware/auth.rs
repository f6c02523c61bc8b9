use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::app::AppState;
use crate::auth::{validate_token, Claims};
use crate::error::ApiError;
use crate::gate::SESSION_COOKIE;

use super::route_gate::cookie_value;

/// Authenticated session extracted from a validated token
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionUser {
    pub user_id: Uuid,
}

impl From<Claims> for SessionUser {
    fn from(claims: Claims) -> Self {
        Self { user_id: claims.sub }
    }
}

/// Session validation for the API. The route gate only checked that a `token`
/// cookie exists; this verifies it and injects a [`SessionUser`].
pub async fn session_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(request.headers()).ok_or_else(|| {
        tracing::warn!("Rejected {}: no session token", request.uri().path());
        ApiError::unauthorized("Missing session token")
    })?;

    let claims = validate_token(&token, &state.config.security.jwt_secret).map_err(|e| {
        tracing::warn!("Rejected {}: {}", request.uri().path(), e);
        ApiError::unauthorized(e.to_string())
    })?;

    request.extensions_mut().insert(SessionUser::from(claims));

    Ok(next.run(request).await)
}

/// Session token from the `token` cookie, else from a Bearer Authorization header
fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = cookie_value(headers, SESSION_COOKIE) {
        return Some(token.to_string());
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}
