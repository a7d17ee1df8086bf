//! Lobby lifecycle: status state machine and membership metadata.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{GameId, GameType, Player, PlayerId};

// ---------------------------------------------------------------------------
// LobbyStatus
// ---------------------------------------------------------------------------

/// The lifecycle state of a lobby.
///
/// ```text
/// WaitingForPlayers ⇄ ReadyToStart → InProgress → Completed
///         │                 │
///         └──(host leaves)──┴──→ Cancelled
/// ```
///
/// The waiting/ready edge is reversible: a leave can drop the lobby back
/// below the minimum player count. `Completed` and `Cancelled` are
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LobbyStatus {
    WaitingForPlayers,
    ReadyToStart,
    InProgress,
    Completed,
    Cancelled,
}

impl LobbyStatus {
    /// Returns `true` if the lobby is accepting new players.
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::WaitingForPlayers | Self::ReadyToStart)
    }

    /// Returns `true` if no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl fmt::Display for LobbyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::WaitingForPlayers => "WaitingForPlayers",
            Self::ReadyToStart => "ReadyToStart",
            Self::InProgress => "InProgress",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// LobbyMetadata
// ---------------------------------------------------------------------------

/// Everything the supervisor tracks about one lobby.
///
/// Invariants:
/// - `host_id` is a key of `players` unless the lobby is `Cancelled`.
/// - `players.len() <= game_type.max_players()`.
/// - membership changes are only valid while the status is joinable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbyMetadata {
    pub game_id: GameId,
    pub game_type: GameType,
    pub players: HashMap<PlayerId, Player>,
    pub host_id: PlayerId,
    pub status: LobbyStatus,
}

impl LobbyMetadata {
    /// Creates a fresh lobby containing only the host.
    pub fn new(game_id: GameId, game_type: GameType, host: Player) -> Self {
        let host_id = host.id;
        let mut players = HashMap::new();
        players.insert(host_id, host);
        let mut lobby = Self {
            game_id,
            game_type,
            players,
            host_id,
            status: LobbyStatus::WaitingForPlayers,
        };
        lobby.recompute_status();
        lobby
    }

    /// Returns `true` if the given player is a member.
    pub fn contains(&self, player: PlayerId) -> bool {
        self.players.contains_key(&player)
    }

    /// Adds a player. The caller has already checked joinability,
    /// duplicates, and capacity; this just inserts and recomputes.
    pub fn add_player(&mut self, player: Player) {
        self.players.insert(player.id, player);
        self.recompute_status();
    }

    /// Removes a player (no-op if absent) and recomputes the status.
    pub fn remove_player(&mut self, player: PlayerId) {
        self.players.remove(&player);
        self.recompute_status();
    }

    /// The members in role order: host first, the rest by id.
    ///
    /// Game models assign roles positionally (tic-tac-toe gives X to the
    /// first player), so the order handed to a starting match must be
    /// deterministic even though membership is a map.
    pub fn ordered_players(&self) -> Vec<Player> {
        let mut rest: Vec<Player> = self
            .players
            .values()
            .filter(|p| p.id != self.host_id)
            .cloned()
            .collect();
        rest.sort_by_key(|p| p.id);

        let mut ordered = Vec::with_capacity(self.players.len());
        if let Some(host) = self.players.get(&self.host_id) {
            ordered.push(host.clone());
        }
        ordered.extend(rest);
        ordered
    }

    /// Recomputes waiting/ready from the player count. Only meaningful
    /// while the lobby has not started; other statuses are left alone.
    fn recompute_status(&mut self) {
        if !self.status.is_joinable() {
            return;
        }
        self.status = if self.players.len() >= self.game_type.min_players() {
            LobbyStatus::ReadyToStart
        } else {
            LobbyStatus::WaitingForPlayers
        };
    }
}
