//! Core domain types for the parlor game backend.
//!
//! This crate is the leaf of the workspace: identities, players, game
//! types, lobby lifecycle, and the game-model error taxonomy. It knows
//! nothing about actors, storage, or HTTP; those layers all speak in
//! terms of the types defined here.

mod error;
mod game_type;
mod id;
mod lobby;
mod player;

pub use error::GameError;
pub use game_type::{GameType, UnknownGameType};
pub use id::{GameId, PlayerId};
pub use lobby::{LobbyMetadata, LobbyStatus};
pub use player::Player;
