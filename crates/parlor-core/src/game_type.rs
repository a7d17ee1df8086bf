//! The closed enumeration of supported game types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A registered family of game rules.
///
/// Each tag carries its player-count bounds; the short name is what
/// appears in URLs and in the `game_type` column of the snapshot table.
/// Adding a game means adding a variant here plus a module bundle in the
/// server. The orchestration layers never branch on the tag themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    TicTacToe,
}

impl GameType {
    /// The canonical short name, as used in URLs and storage.
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::TicTacToe => "tictactoe",
        }
    }

    /// Minimum players required to start a match.
    pub fn min_players(&self) -> usize {
        match self {
            Self::TicTacToe => 2,
        }
    }

    /// Maximum players a lobby for this game may hold.
    pub fn max_players(&self) -> usize {
        match self {
            Self::TicTacToe => 2,
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Error returned when a short name does not match any registered tag.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown game type: {0}")]
pub struct UnknownGameType(pub String);

impl FromStr for GameType {
    type Err = UnknownGameType;

    /// Parses a short name case-insensitively ("tictactoe", "TicTacToe", ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("tictactoe") {
            Ok(Self::TicTacToe)
        } else {
            Err(UnknownGameType(s.to_string()))
        }
    }
}
