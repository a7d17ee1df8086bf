//! Axum extractor for the authenticated player.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use parlor_core::Player;

use crate::auth::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// The player identified by the request's `Authorization: Bearer` token.
///
/// Use as a handler parameter on any endpoint that requires auth:
///
/// ```ignore
/// async fn handler(AuthPlayer(player): AuthPlayer) -> AppResult<Json<...>> { ... }
/// ```
#[derive(Debug, Clone)]
pub struct AuthPlayer(pub Player);

impl FromRequestParts<AppState> for AuthPlayer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Unauthorized("Invalid Authorization format. Expected: Bearer <token>".into())
        })?;

        let player = validate_token(token, &state.config.jwt)
            .map_err(|e| AppError::Unauthorized(e.to_string()))?;
        Ok(AuthPlayer(player))
    }
}
