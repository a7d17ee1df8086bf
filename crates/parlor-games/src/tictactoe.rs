//! Tic-tac-toe rules.
//!
//! The worked example of the game-model contract: two players, a 3×3
//! board, X goes first. The first player in role order plays X, the
//! second plays O.

use parlor_core::{GameError, GameType, Player, PlayerId};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{GameModel, MatchStatus, MovePayload, Snapshot};

/// A player's mark on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn other(self) -> Self {
        match self {
            Self::X => Self::O,
            Self::O => Self::X,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::X => "X",
            Self::O => "O",
        }
    }
}

/// A single move: place the mover's mark at `(row, col)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub row: usize,
    pub col: usize,
}

/// One cell of the board; `None` is empty.
pub type Cell = Option<Mark>;

/// The full state of a tic-tac-toe match.
///
/// `players[0]` plays X, `players[1]` plays O. Serialized as-is by the
/// snapshot codec, so field names are part of the storage format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    players: [Player; 2],
    board: [[Cell; 3]; 3],
    current_mark: Mark,
    winner: Option<Mark>,
    is_draw: bool,
}

impl GameState {
    /// The mark the given player controls, if they are a participant.
    fn mark_of(&self, player: PlayerId) -> Option<Mark> {
        if self.players[0].id == player {
            Some(Mark::X)
        } else if self.players[1].id == player {
            Some(Mark::O)
        } else {
            None
        }
    }

    /// The participant controlling the given mark.
    fn player_for(&self, mark: Mark) -> &Player {
        match mark {
            Mark::X => &self.players[0],
            Mark::O => &self.players[1],
        }
    }

    fn is_terminal(&self) -> bool {
        self.winner.is_some() || self.is_draw
    }

    fn board_full(&self) -> bool {
        self.board
            .iter()
            .all(|row| row.iter().all(|cell| cell.is_some()))
    }

    /// Checks whether `mark` holds a complete row, column, or diagonal.
    fn has_line(&self, mark: Mark) -> bool {
        let b = &self.board;
        let owns = |r: usize, c: usize| b[r][c] == Some(mark);
        (0..3).any(|r| (0..3).all(|c| owns(r, c)))
            || (0..3).any(|c| (0..3).all(|r| owns(r, c)))
            || (0..3).all(|i| owns(i, i))
            || (0..3).all(|i| owns(i, 2 - i))
    }
}

impl GameModel for GameState {
    type Move = Move;

    fn game_type() -> GameType {
        GameType::TicTacToe
    }

    fn new_match(players: Vec<Player>) -> Result<Self, GameError> {
        let ty = Self::game_type();
        if players.len() < ty.min_players() || players.len() > ty.max_players() {
            return Err(GameError::Unknown(format!(
                "{} takes {} players, got {}",
                ty,
                ty.max_players(),
                players.len()
            )));
        }
        let mut it = players.into_iter();
        let x = it.next().ok_or(GameError::Unknown("no players".into()))?;
        let o = it.next().ok_or(GameError::Unknown("no players".into()))?;
        Ok(Self {
            players: [x, o],
            board: [[None; 3]; 3],
            current_mark: Mark::X,
            winner: None,
            is_draw: false,
        })
    }

    fn players(&self) -> &[Player] {
        &self.players
    }

    fn current_player(&self) -> &Player {
        self.player_for(self.current_mark)
    }

    fn status(&self) -> MatchStatus {
        if let Some(mark) = self.winner {
            MatchStatus::Won(self.player_for(mark).clone())
        } else if self.is_draw {
            MatchStatus::Draw
        } else {
            MatchStatus::InProgress
        }
    }

    fn apply(&self, player: PlayerId, mv: &Move) -> Result<Self, GameError> {
        if self.is_terminal() {
            return Err(GameError::GameOver);
        }
        let mark = self.mark_of(player).ok_or(GameError::InvalidPlayer(player))?;
        if mark != self.current_mark {
            return Err(GameError::InvalidTurn);
        }
        if mv.row >= 3 || mv.col >= 3 {
            return Err(GameError::OutOfBounds);
        }
        if self.board[mv.row][mv.col].is_some() {
            return Err(GameError::CellOccupied);
        }

        let mut next = self.clone();
        next.board[mv.row][mv.col] = Some(mark);
        if next.has_line(mark) {
            next.winner = Some(mark);
        } else if next.board_full() {
            next.is_draw = true;
        } else {
            next.current_mark = mark.other();
        }
        Ok(next)
    }

    fn extract_move(payload: MovePayload) -> Result<Move, GameError> {
        match payload {
            MovePayload::TicTacToe(mv) => Ok(mv),
        }
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot::TicTacToe(self.clone())
    }

    fn from_snapshot(snapshot: Snapshot) -> Option<Self> {
        match snapshot {
            Snapshot::TicTacToe(state) => Some(state),
        }
    }

    /// The client-facing view. Cells render as `"X"`, `"O"`, or `""`;
    /// `currentPlayer` is the mark whose turn it is.
    fn view(&self) -> serde_json::Value {
        let board: Vec<Vec<&str>> = self
            .board
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.map(Mark::as_str).unwrap_or(""))
                    .collect()
            })
            .collect();

        json!({
            "board": board,
            "currentPlayer": self.current_mark.as_str(),
            "winner": self.winner.map(Mark::as_str),
            "draw": self.is_draw,
            "players": [
                { "id": self.players[0].id, "name": self.players[0].name, "mark": "X" },
                { "id": self.players[1].id, "name": self.players[1].name, "mark": "O" },
            ],
        })
    }
}
