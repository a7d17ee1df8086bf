//! Game-agnostic operations routed through the supervisor.

use parlor_core::PlayerId;
use parlor_games::MovePayload;

/// An operation on a live match, independent of the game type.
///
/// The HTTP layer builds these (after the module bundle has decoded the
/// game-specific body into a [`MovePayload`]) and the supervisor routes
/// them to the owning match worker.
#[derive(Debug, Clone)]
pub enum GameOperation {
    MakeMove {
        player: PlayerId,
        payload: MovePayload,
    },
    GetState,
}
