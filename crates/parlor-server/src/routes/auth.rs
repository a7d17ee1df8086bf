//! Token issuance and identity introspection.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use parlor_core::{Player, PlayerId};

use crate::auth::{issue_token, AuthPlayer};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/token", post(token))
        .route("/auth/whoami", get(whoami))
}

#[derive(Debug, Deserialize)]
struct TokenRequest {
    /// Optional stable id; a fresh one is minted when absent.
    id: Option<String>,
    name: String,
}

#[derive(Debug, Serialize)]
struct TokenResponse {
    token: String,
}

/// `POST /auth/token`: issues a bearer token for the given identity.
///
/// Unauthenticated by design: this is how a client bootstraps its
/// identity. Supplying a malformed `id` is a 400.
async fn token(
    State(state): State<AppState>,
    Json(body): Json<TokenRequest>,
) -> AppResult<Json<TokenResponse>> {
    let id = match body.id {
        Some(raw) => raw
            .parse::<PlayerId>()
            .map_err(|_| AppError::BadRequest(format!("malformed player id: {raw}")))?,
        None => PlayerId::random(),
    };

    let player = Player::new(id, body.name);
    let token = issue_token(&player, &state.config.jwt)
        .map_err(|e| AppError::BadRequest(format!("could not issue token: {e}")))?;

    tracing::debug!(player = %player.id, "token issued");
    Ok(Json(TokenResponse { token }))
}

#[derive(Debug, Serialize)]
struct WhoAmI {
    id: PlayerId,
    name: String,
}

/// `GET /auth/whoami`: echoes the identity inside the presented token.
async fn whoami(AuthPlayer(player): AuthPlayer) -> Json<WhoAmI> {
    Json(WhoAmI {
        id: player.id,
        name: player.name,
    })
}
