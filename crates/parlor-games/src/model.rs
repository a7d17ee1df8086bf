//! The `GameModel` trait: the contract between game rules and the kernel.

use parlor_core::{GameError, GameType, Player, PlayerId};
use serde::{Deserialize, Serialize};

use crate::tictactoe;
use crate::Snapshot;

/// The externally visible status of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    InProgress,
    Won(Player),
    Draw,
}

impl MatchStatus {
    /// Returns `true` for `Won` and `Draw`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

/// A game-specific move, tagged by game type.
///
/// Clients send game-specific JSON; the module bundle for the game type
/// parses it into the matching variant. The kernel carries the payload
/// opaquely and the target model unpacks it again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MovePayload {
    TicTacToe(tictactoe::Move),
}

impl MovePayload {
    /// The game type this payload belongs to.
    pub fn game_type(&self) -> GameType {
        match self {
            Self::TicTacToe(_) => GameType::TicTacToe,
        }
    }
}

/// Pure rules for one game type: an immutable state plus
/// `apply(player, move) → state′ | error`.
///
/// Implementations hold no channels and spawn no tasks; the match
/// worker owns the state and drives it. Every method that "changes"
/// state returns a fresh value; a rejected move leaves the old state
/// untouched by construction.
pub trait GameModel: Clone + Send + Sync + Sized + 'static {
    /// The game-specific move type.
    type Move: Send + 'static;

    /// The tag this model is registered under.
    fn game_type() -> GameType;

    /// Creates the initial state for a fresh match.
    ///
    /// Fails when the player count falls outside the game type's
    /// `[min_players, max_players]` bounds.
    fn new_match(players: Vec<Player>) -> Result<Self, GameError>;

    /// The participants, in role order.
    fn players(&self) -> &[Player];

    /// The participant whose turn it is.
    fn current_player(&self) -> &Player;

    /// Current match status.
    fn status(&self) -> MatchStatus;

    /// Applies a move for the given player, returning the successor
    /// state or the reason the move is rejected.
    fn apply(&self, player: PlayerId, mv: &Self::Move) -> Result<Self, GameError>;

    /// Unpacks the tagged payload into this model's move type, rejecting
    /// payloads tagged for a different game.
    fn extract_move(payload: MovePayload) -> Result<Self::Move, GameError>;

    /// Wraps the state into the closed snapshot union for storage.
    fn snapshot(&self) -> Snapshot;

    /// Unwraps a stored snapshot; `None` when the snapshot belongs to a
    /// different game type.
    fn from_snapshot(snapshot: Snapshot) -> Option<Self>;

    /// The serializable view sent to clients.
    fn view(&self) -> serde_json::Value;
}
