//! HTTP route handlers, grouped by surface.

pub mod auth;
pub mod game;
pub mod health;
pub mod lobby;

use parlor_core::{GameId, GameType};

use crate::error::AppError;

/// Parses a `{gameId}` path segment.
pub(crate) fn parse_game_id(raw: &str) -> Result<GameId, AppError> {
    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("malformed game id: {raw}")))
}

/// Parses a `{gameType}` path segment (case-insensitive short name).
pub(crate) fn parse_game_type(raw: &str) -> Result<GameType, AppError> {
    raw.parse()
        .map_err(|e: parlor_core::UnknownGameType| AppError::BadRequest(e.to_string()))
}
