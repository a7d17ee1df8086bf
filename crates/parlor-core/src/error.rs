//! The game-model error taxonomy.

use crate::PlayerId;

/// Errors a game model (or the match worker wrapping it) can report for
/// a move. These are reported to the caller verbatim and never crash a
/// worker.
///
/// The messages are part of the observable contract (clients match on
/// them), so keep them stable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// The player is not a participant in this match.
    #[error("Player {0} is not part of this game")]
    InvalidPlayer(PlayerId),

    /// It is some other participant's turn.
    #[error("It's not your turn")]
    InvalidTurn,

    /// The targeted cell already holds a mark.
    #[error("Cell is already occupied")]
    CellOccupied,

    /// The move coordinates fall outside the board.
    #[error("Move is out of bounds")]
    OutOfBounds,

    /// The match already ended; no further moves are accepted.
    #[error("The game is already over.")]
    GameOver,

    /// Anything the taxonomy does not name.
    #[error("{0}")]
    Unknown(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_stable() {
        assert_eq!(GameError::InvalidTurn.to_string(), "It's not your turn");
        assert_eq!(
            GameError::GameOver.to_string(),
            "The game is already over."
        );
        assert_eq!(
            GameError::CellOccupied.to_string(),
            "Cell is already occupied"
        );
        assert_eq!(
            GameError::OutOfBounds.to_string(),
            "Move is out of bounds"
        );
    }
}
