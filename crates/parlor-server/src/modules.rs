//! Game-module bundles wired into this server.
//!
//! One bundle per supported game type. Adding a game is: implement its
//! rules in `parlor-games`, add a bundle struct here, register it in
//! [`default_registry`]. The supervisor and the routes never change.

use serde_json::Value;

use parlor_core::{GameError, GameId, GameType, Player};
use parlor_games::tictactoe;
use parlor_games::{CodecError, MovePayload, Snapshot};
use parlor_kernel::{
    restore_match, spawn_match, GameModule, MatchHandle, ModuleRegistry, SupervisorMailbox,
};
use parlor_store::PersistenceHandle;

/// Tic-tac-toe bundle.
pub struct TicTacToeModule;

impl GameModule for TicTacToeModule {
    fn game_type(&self) -> GameType {
        GameType::TicTacToe
    }

    fn decode_move(&self, body: &Value) -> Result<MovePayload, CodecError> {
        serde_json::from_value::<tictactoe::Move>(body.clone())
            .map(MovePayload::TicTacToe)
            .map_err(CodecError::Decode)
    }

    fn create(
        &self,
        game_id: GameId,
        players: Vec<Player>,
        persistence: PersistenceHandle,
        supervisor: SupervisorMailbox,
    ) -> Result<(MatchHandle, Snapshot), GameError> {
        spawn_match::<tictactoe::GameState>(game_id, players, persistence, supervisor)
    }

    fn restore(
        &self,
        game_id: GameId,
        snapshot: Snapshot,
        persistence: PersistenceHandle,
        supervisor: SupervisorMailbox,
    ) -> Option<MatchHandle> {
        restore_match::<tictactoe::GameState>(game_id, snapshot, persistence, supervisor)
    }
}

/// The registry served by this binary.
pub fn default_registry() -> ModuleRegistry {
    ModuleRegistry::new().register(TicTacToeModule)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_decode_move_accepts_row_col_body() {
        let payload = TicTacToeModule.decode_move(&json!({"row": 1, "col": 2})).unwrap();
        assert_eq!(
            payload,
            MovePayload::TicTacToe(tictactoe::Move { row: 1, col: 2 })
        );
    }

    #[test]
    fn test_decode_move_rejects_wrong_shape() {
        assert!(TicTacToeModule.decode_move(&json!({"x": 1})).is_err());
        assert!(TicTacToeModule.decode_move(&json!("0,0")).is_err());
    }

    #[test]
    fn test_registry_serves_tictactoe() {
        let registry = default_registry();
        assert!(registry.get(GameType::TicTacToe).is_some());
    }
}
