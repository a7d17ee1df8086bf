//! The game-module contract and registry.
//!
//! A module is the bundle that plugs one game type into the kernel: it
//! decodes that game's client JSON into a tagged move payload and it
//! knows how to spawn workers for fresh and restored matches of its
//! game. The supervisor and the HTTP layer only ever talk to modules
//! through this trait, which is what keeps them free of game-type
//! branches.

use std::collections::HashMap;
use std::sync::Arc;

use parlor_core::{GameError, GameId, GameType, Player};
use parlor_games::{CodecError, MovePayload, Snapshot};
use parlor_store::PersistenceHandle;

use crate::supervisor::SupervisorMailbox;
use crate::MatchHandle;

/// Everything the kernel needs from one game type.
pub trait GameModule: Send + Sync + 'static {
    /// The tag this module serves.
    fn game_type(&self) -> GameType;

    /// Parses a client move body into this game's payload.
    fn decode_move(&self, body: &serde_json::Value) -> Result<MovePayload, CodecError>;

    /// Spawns a worker for a fresh match, pre-validating the player
    /// count. Returns the handle plus the initial snapshot for the
    /// caller to persist.
    fn create(
        &self,
        game_id: GameId,
        players: Vec<Player>,
        persistence: PersistenceHandle,
        supervisor: SupervisorMailbox,
    ) -> Result<(MatchHandle, Snapshot), GameError>;

    /// Spawns a worker from a stored snapshot; `None` when the snapshot
    /// does not belong to this game.
    fn restore(
        &self,
        game_id: GameId,
        snapshot: Snapshot,
        persistence: PersistenceHandle,
        supervisor: SupervisorMailbox,
    ) -> Option<MatchHandle>;
}

/// The static mapping from game type to module bundle.
///
/// Built once at startup and read-only afterwards. Adding a game means
/// registering one more bundle here; nothing else changes.
#[derive(Default)]
pub struct ModuleRegistry {
    modules: HashMap<GameType, Arc<dyn GameModule>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a module under its own game type. Replaces any
    /// previous registration for the same tag.
    pub fn register(mut self, module: impl GameModule) -> Self {
        self.modules.insert(module.game_type(), Arc::new(module));
        self
    }

    /// Looks up the module for a game type.
    pub fn get(&self, game_type: GameType) -> Option<Arc<dyn GameModule>> {
        self.modules.get(&game_type).cloned()
    }
}
