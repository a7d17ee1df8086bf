//! Orchestration errors.

use parlor_core::GameError;

/// Errors the supervisor reports to callers.
///
/// The messages are the observable API (the HTTP layer forwards them
/// verbatim in JSON error bodies), so they stay exactly as clients know
/// them, even where that reads oddly in a log.
#[derive(Debug, thiserror::Error)]
pub enum SupervisorError {
    /// No lobby with that id (join/leave/info).
    #[error("No such lobby")]
    LobbyNotFound,

    /// No lobby with that id (start).
    #[error("No such game")]
    GameNotFound,

    /// No live match with that id.
    #[error("No game found with gameId")]
    MatchNotFound,

    /// The lobby already holds its maximum player count.
    #[error("lobby is full")]
    LobbyFull,

    /// The player is already a member of the lobby.
    #[error("already in game")]
    AlreadyJoined,

    /// The lobby has started or ended and accepts no new members.
    #[error("game already started or ended")]
    NotJoinable,

    /// Start was requested by a non-host, or before the lobby was ready.
    #[error("Only host can start, and game must be ready to start")]
    NotStartable,

    /// No module is registered for the game type.
    #[error("unsupported game type: {0}")]
    UnsupportedGameType(String),

    /// The supervisor's start-up buffer overflowed before restore
    /// finished. Indicates a misconfigured stash bound, not caller error.
    #[error("server is still starting")]
    StashOverflow,

    /// A game-model rejection, forwarded verbatim.
    #[error(transparent)]
    Game(#[from] GameError),

    /// A reply channel was dropped or a worker is gone.
    #[error("Unexpected response")]
    Unexpected,
}
