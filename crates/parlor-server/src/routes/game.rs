//! Game endpoints: submit a move, query match state.
//!
//! Both paths carry the game type so the right module can decode the
//! game-specific body; routing to the match itself goes by id. The
//! handlers contain no game-type branches; the module registry does
//! the dispatch.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;

use parlor_kernel::GameOperation;

use crate::auth::AuthPlayer;
use crate::error::{AppError, AppResult};
use crate::routes::{parse_game_id, parse_game_type};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{game_type}/{game_id}/move", post(submit_move))
        .route("/{game_type}/{game_id}/status", get(status))
}

/// `POST /{gameType}/{gameId}/move`: submits the caller's move.
/// Replies with the updated state view.
async fn submit_move(
    State(state): State<AppState>,
    Path((raw_type, raw_id)): Path<(String, String)>,
    AuthPlayer(player): AuthPlayer,
    Json(body): Json<Value>,
) -> AppResult<Json<Value>> {
    let game_type = parse_game_type(&raw_type)?;
    let game_id = parse_game_id(&raw_id)?;

    let module = state
        .registry
        .get(game_type)
        .ok_or_else(|| AppError::BadRequest(format!("unsupported game type: {game_type}")))?;
    let payload = module
        .decode_move(&body)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let view = state
        .ask(state.supervisor.run_operation(
            game_id,
            GameOperation::MakeMove {
                player: player.id,
                payload,
            },
        ))
        .await?;
    Ok(Json(view))
}

/// `GET /{gameType}/{gameId}/status`: the current state view.
/// Unauthenticated.
async fn status(
    State(state): State<AppState>,
    Path((raw_type, raw_id)): Path<(String, String)>,
) -> AppResult<Json<Value>> {
    parse_game_type(&raw_type)?;
    let game_id = parse_game_id(&raw_id)?;

    let view = state
        .ask(state
            .supervisor
            .run_operation(game_id, GameOperation::GetState))
        .await?;
    Ok(Json(view))
}
