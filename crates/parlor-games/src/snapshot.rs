//! Snapshot union and codec.
//!
//! A snapshot is the whole state of one match, encoded as a textual JSON
//! payload. The `game_type` column of the storage table carries the tag,
//! so the payload itself is the plain JSON of the state, with no envelope.
//! This module is the single place the payload format lives; the
//! repository and the workers go through it and never touch serde_json
//! themselves.

use parlor_core::GameType;

use crate::tictactoe;

/// The whole state of one match, tagged by game type.
#[derive(Debug, Clone)]
pub enum Snapshot {
    TicTacToe(tictactoe::GameState),
}

impl Snapshot {
    /// The tag identifying which game's state this is.
    pub fn game_type(&self) -> GameType {
        match self {
            Self::TicTacToe(_) => GameType::TicTacToe,
        }
    }
}

/// Errors from the snapshot codec.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Serialization failed. Should not happen for well-formed states;
    /// surfaced rather than swallowed so storage never writes garbage.
    #[error("encode failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// The payload is malformed or does not match the expected game type.
    #[error("decode failed: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Encodes a snapshot into its storage payload.
pub fn encode_snapshot(snapshot: &Snapshot) -> Result<String, CodecError> {
    match snapshot {
        Snapshot::TicTacToe(state) => {
            serde_json::to_string(state).map_err(CodecError::Encode)
        }
    }
}

/// Decodes a storage payload for the given game type.
pub fn decode_snapshot(game_type: GameType, payload: &str) -> Result<Snapshot, CodecError> {
    match game_type {
        GameType::TicTacToe => serde_json::from_str(payload)
            .map(Snapshot::TicTacToe)
            .map_err(CodecError::Decode),
    }
}

#[cfg(test)]
mod tests {
    use parlor_core::{Player, PlayerId};

    use super::*;
    use crate::{GameModel, MatchStatus};

    fn state() -> (tictactoe::GameState, PlayerId) {
        let alice = Player::new(PlayerId::random(), "alice");
        let bob = Player::new(PlayerId::random(), "bob");
        let a = alice.id;
        (tictactoe::GameState::new_match(vec![alice, bob]).unwrap(), a)
    }

    #[test]
    fn test_round_trip_preserves_state() {
        let (state, alice) = state();
        let state = state
            .apply(alice, &tictactoe::Move { row: 0, col: 0 })
            .unwrap();

        let payload = encode_snapshot(&state.snapshot()).unwrap();
        let decoded = decode_snapshot(GameType::TicTacToe, &payload).unwrap();

        let restored = tictactoe::GameState::from_snapshot(decoded).unwrap();
        assert_eq!(restored.view(), state.view());
        assert_eq!(restored.status(), MatchStatus::InProgress);
        assert_eq!(restored.current_player().id, state.current_player().id);
    }

    #[test]
    fn test_decode_rejects_malformed_payload() {
        assert!(decode_snapshot(GameType::TicTacToe, "not-json").is_err());
        assert!(decode_snapshot(GameType::TicTacToe, "{}").is_err());
    }

    #[test]
    fn test_payload_is_plain_state_json() {
        let (state, _) = state();
        let payload = encode_snapshot(&state.snapshot()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
        // No envelope: the state's own fields sit at the top level.
        assert!(value["board"].is_array());
        assert!(value["players"].is_array());
    }
}
