//! Lobby endpoints: create, join, leave, start, inspect, list.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;

use parlor_core::{GameId, LobbyMetadata, Player};

use crate::auth::AuthPlayer;
use crate::error::AppResult;
use crate::routes::{parse_game_id, parse_game_type};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/lobby/create/{game_type}", post(create))
        .route("/lobby/list", get(list))
        .route("/lobby/{game_id}", get(info))
        .route("/lobby/{game_id}/join", post(join))
        .route("/lobby/{game_id}/leave", post(leave))
        .route("/lobby/{game_id}/start", post(start))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LobbyCreated {
    game_id: GameId,
    lobby: LobbyMetadata,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LobbyJoined {
    game_id: GameId,
    lobby: LobbyMetadata,
    player: Player,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LobbyLeft {
    game_id: GameId,
    message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GameStarted {
    game_id: GameId,
}

/// `POST /lobby/create/{gameType}`: creates a lobby hosted by the caller.
async fn create(
    State(state): State<AppState>,
    Path(raw_type): Path<String>,
    AuthPlayer(host): AuthPlayer,
) -> AppResult<Json<LobbyCreated>> {
    let game_type = parse_game_type(&raw_type)?;
    let lobby = state
        .ask(state.supervisor.create_lobby(game_type, host))
        .await?;
    Ok(Json(LobbyCreated {
        game_id: lobby.game_id,
        lobby,
    }))
}

/// `POST /lobby/{gameId}/join`: joins the caller to an open lobby.
async fn join(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    AuthPlayer(player): AuthPlayer,
) -> AppResult<Json<LobbyJoined>> {
    let game_id = parse_game_id(&raw_id)?;
    let lobby = state
        .ask(state.supervisor.join_lobby(game_id, player.clone()))
        .await?;
    Ok(Json(LobbyJoined {
        game_id,
        lobby,
        player,
    }))
}

/// `POST /lobby/{gameId}/leave`: removes the caller from a lobby.
/// A departing host cancels the lobby.
async fn leave(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    AuthPlayer(player): AuthPlayer,
) -> AppResult<Json<LobbyLeft>> {
    let game_id = parse_game_id(&raw_id)?;
    let left = state
        .ask(state.supervisor.leave_lobby(game_id, player.id))
        .await?;
    Ok(Json(LobbyLeft {
        game_id: left.game_id,
        message: left.message.to_string(),
    }))
}

/// `POST /lobby/{gameId}/start`: starts the match. Host only, and only
/// once the lobby is ready.
async fn start(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    AuthPlayer(caller): AuthPlayer,
) -> AppResult<Json<GameStarted>> {
    let game_id = parse_game_id(&raw_id)?;
    let game_id = state
        .ask(state.supervisor.start_game(game_id, caller.id))
        .await?;
    Ok(Json(GameStarted { game_id }))
}

/// `GET /lobby/{gameId}`: lobby metadata. Unauthenticated.
async fn info(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<LobbyMetadata>> {
    let game_id = parse_game_id(&raw_id)?;
    let lobby = state.ask(state.supervisor.lobby_info(game_id)).await?;
    Ok(Json(lobby))
}

/// `GET /lobby/list`: every joinable lobby. Unauthenticated.
async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<LobbyMetadata>>> {
    let lobbies = state.ask(state.supervisor.list_lobbies()).await?;
    Ok(Json(lobbies))
}
