//! The supervisor: owner of the lobby table and the live-match index.
//!
//! A single task processes every lobby mutation and every match-index
//! lookup, so there is exactly one point of ordering for both maps.
//! Game-state mutations never happen here (they live inside the match
//! workers), and the supervisor never awaits a worker while processing
//! its own mailbox (replies are forwarded through spawned adapter
//! tasks), so it cannot deadlock against one.
//!
//! Start-up runs in two phases. The supervisor begins **Initializing**:
//! it asks the persistence worker for every stored snapshot and stashes
//! any command arriving in the meantime in a bounded FIFO. When the
//! restore reply lands it spawns a worker per usable snapshot, drains
//! the stash in arrival order, and becomes **Running**. Lobbies are not
//! restored, only in-progress matches.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{mpsc, oneshot};

use parlor_core::{GameId, GameType, LobbyMetadata, LobbyStatus, Player, PlayerId};
use parlor_games::Snapshot;
use parlor_store::{PersistenceHandle, StorageError};

use crate::{GameOperation, MatchHandle, ModuleRegistry, SupervisorError};

/// Mailbox capacity for the supervisor.
const CHANNEL_SIZE: usize = 64;

/// Maximum commands buffered while the restore is in flight. Overflow
/// rejects the overflowing command and logs at error level.
const STASH_LIMIT: usize = 128;

type Reply<T> = oneshot::Sender<Result<T, SupervisorError>>;

/// Reply to a leave request.
#[derive(Debug, Clone)]
pub struct LobbyLeft {
    pub game_id: GameId,
    pub message: &'static str,
}

/// Commands understood by the supervisor.
pub(crate) enum SupervisorCommand {
    CreateLobby {
        game_type: GameType,
        host: Player,
        reply: Reply<LobbyMetadata>,
    },
    JoinLobby {
        game_id: GameId,
        player: Player,
        reply: Reply<LobbyMetadata>,
    },
    LeaveLobby {
        game_id: GameId,
        player: PlayerId,
        reply: Reply<LobbyLeft>,
    },
    StartGame {
        game_id: GameId,
        caller: PlayerId,
        reply: Reply<GameId>,
    },
    ListLobbies {
        reply: Reply<Vec<LobbyMetadata>>,
    },
    LobbyInfo {
        game_id: GameId,
        reply: Reply<LobbyMetadata>,
    },
    RunOperation {
        game_id: GameId,
        operation: GameOperation,
        reply: Reply<Value>,
    },
    /// From a match worker: the match reached a terminal state.
    GameCompleted { game_id: GameId },
    /// Resolves once the supervisor is Running. Stashed like any other
    /// command during restore, which is exactly what makes it a ready
    /// signal.
    Ready { reply: oneshot::Sender<()> },
    /// Internal: the restore task finished.
    Restored {
        result: Result<HashMap<GameId, (GameType, Snapshot)>, StorageError>,
    },
}

/// The channel a match worker uses to report back to its supervisor.
///
/// Opaque to modules: they receive one in `create`/`restore` and hand
/// it to the worker they spawn.
#[derive(Clone)]
pub struct SupervisorMailbox {
    sender: mpsc::Sender<SupervisorCommand>,
}

impl SupervisorMailbox {
    /// Reports a terminal match without blocking the reporting worker:
    /// the send runs in its own task so a move reply is never gated on
    /// supervisor mailbox space.
    pub(crate) fn notify_completed(&self, game_id: GameId) {
        let sender = self.sender.clone();
        tokio::spawn(async move {
            if sender
                .send(SupervisorCommand::GameCompleted { game_id })
                .await
                .is_err()
            {
                tracing::warn!(%game_id, "supervisor gone, completion not recorded");
            }
        });
    }
}

/// Handle to the running supervisor. Cheap to clone; the HTTP layer
/// holds one.
#[derive(Clone)]
pub struct SupervisorHandle {
    sender: mpsc::Sender<SupervisorCommand>,
}

impl SupervisorHandle {
    async fn ask<T>(
        &self,
        build: impl FnOnce(Reply<T>) -> SupervisorCommand,
    ) -> Result<T, SupervisorError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(build(reply_tx))
            .await
            .map_err(|_| SupervisorError::Unexpected)?;
        reply_rx.await.map_err(|_| SupervisorError::Unexpected)?
    }

    /// Creates a lobby for the given game type, hosted by `host`.
    pub async fn create_lobby(
        &self,
        game_type: GameType,
        host: Player,
    ) -> Result<LobbyMetadata, SupervisorError> {
        self.ask(|reply| SupervisorCommand::CreateLobby {
            game_type,
            host,
            reply,
        })
        .await
    }

    /// Adds a player to a lobby.
    pub async fn join_lobby(
        &self,
        game_id: GameId,
        player: Player,
    ) -> Result<LobbyMetadata, SupervisorError> {
        self.ask(|reply| SupervisorCommand::JoinLobby {
            game_id,
            player,
            reply,
        })
        .await
    }

    /// Removes a player from a lobby. Host departure cancels the lobby.
    pub async fn leave_lobby(
        &self,
        game_id: GameId,
        player: PlayerId,
    ) -> Result<LobbyLeft, SupervisorError> {
        self.ask(|reply| SupervisorCommand::LeaveLobby {
            game_id,
            player,
            reply,
        })
        .await
    }

    /// Starts the match for a ready lobby. Host only.
    pub async fn start_game(
        &self,
        game_id: GameId,
        caller: PlayerId,
    ) -> Result<GameId, SupervisorError> {
        self.ask(|reply| SupervisorCommand::StartGame {
            game_id,
            caller,
            reply,
        })
        .await
    }

    /// Lists every joinable lobby.
    pub async fn list_lobbies(&self) -> Result<Vec<LobbyMetadata>, SupervisorError> {
        self.ask(|reply| SupervisorCommand::ListLobbies { reply })
            .await
    }

    /// Fetches one lobby's metadata.
    pub async fn lobby_info(&self, game_id: GameId) -> Result<LobbyMetadata, SupervisorError> {
        self.ask(|reply| SupervisorCommand::LobbyInfo { game_id, reply })
            .await
    }

    /// Routes a game operation to the owning match worker and returns
    /// the translated reply.
    pub async fn run_operation(
        &self,
        game_id: GameId,
        operation: GameOperation,
    ) -> Result<Value, SupervisorError> {
        self.ask(|reply| SupervisorCommand::RunOperation {
            game_id,
            operation,
            reply,
        })
        .await
    }

    /// Resolves once start-up restore has finished.
    pub async fn ready(&self) -> Result<(), SupervisorError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(SupervisorCommand::Ready { reply: reply_tx })
            .await
            .map_err(|_| SupervisorError::Unexpected)?;
        reply_rx.await.map_err(|_| SupervisorError::Unexpected)
    }
}

/// The supervisor's internal state.
struct Supervisor {
    lobbies: HashMap<GameId, LobbyMetadata>,
    matches: HashMap<GameId, (GameType, MatchHandle)>,
    registry: Arc<ModuleRegistry>,
    persistence: PersistenceHandle,
    mailbox: SupervisorMailbox,
    receiver: mpsc::Receiver<SupervisorCommand>,
    stash: VecDeque<SupervisorCommand>,
    restoring: bool,
}

impl Supervisor {
    async fn run(mut self) {
        tracing::info!("supervisor started, restoring snapshots");

        while let Some(cmd) = self.receiver.recv().await {
            if self.restoring {
                match cmd {
                    SupervisorCommand::Restored { result } => {
                        self.finish_restore(result);
                        while let Some(stashed) = self.stash.pop_front() {
                            self.handle(stashed);
                        }
                        tracing::info!("supervisor running");
                    }
                    other => self.stash(other),
                }
                continue;
            }
            self.handle(cmd);
        }

        tracing::info!("supervisor stopped");
    }

    /// Buffers a command until restore completes. Overflow rejects the
    /// command instead of dropping it silently.
    fn stash(&mut self, cmd: SupervisorCommand) {
        if self.stash.len() >= STASH_LIMIT {
            tracing::error!(limit = STASH_LIMIT, "start-up stash overflow, rejecting command");
            reject(cmd, || SupervisorError::StashOverflow);
            return;
        }
        self.stash.push_back(cmd);
    }

    /// Spawns a worker for every usable snapshot. Rows whose game type
    /// has no registered module, or whose snapshot the module refuses,
    /// are skipped with a log; a bad row never blocks the rest.
    fn finish_restore(
        &mut self,
        result: Result<HashMap<GameId, (GameType, Snapshot)>, StorageError>,
    ) {
        self.restoring = false;
        let snapshots = match result {
            Ok(snapshots) => snapshots,
            Err(e) => {
                tracing::error!(error = %e, "snapshot restore failed, starting with no matches");
                return;
            }
        };

        let total = snapshots.len();
        for (game_id, (game_type, snapshot)) in snapshots {
            let Some(module) = self.registry.get(game_type) else {
                tracing::warn!(%game_id, %game_type, "skipping snapshot: no module registered");
                continue;
            };
            match module.restore(
                game_id,
                snapshot,
                self.persistence.clone(),
                self.mailbox.clone(),
            ) {
                Some(handle) => {
                    self.matches.insert(game_id, (game_type, handle));
                }
                None => {
                    tracing::warn!(%game_id, %game_type, "skipping snapshot: module refused to restore");
                }
            }
        }
        tracing::info!(restored = self.matches.len(), total, "snapshot restore complete");
    }

    fn handle(&mut self, cmd: SupervisorCommand) {
        match cmd {
            SupervisorCommand::CreateLobby {
                game_type,
                host,
                reply,
            } => {
                let _ = reply.send(self.create_lobby(game_type, host));
            }
            SupervisorCommand::JoinLobby {
                game_id,
                player,
                reply,
            } => {
                let _ = reply.send(self.join_lobby(game_id, player));
            }
            SupervisorCommand::LeaveLobby {
                game_id,
                player,
                reply,
            } => {
                let _ = reply.send(self.leave_lobby(game_id, player));
            }
            SupervisorCommand::StartGame {
                game_id,
                caller,
                reply,
            } => {
                let _ = reply.send(self.start_game(game_id, caller));
            }
            SupervisorCommand::ListLobbies { reply } => {
                let joinable = self
                    .lobbies
                    .values()
                    .filter(|l| l.status.is_joinable())
                    .cloned()
                    .collect();
                let _ = reply.send(Ok(joinable));
            }
            SupervisorCommand::LobbyInfo { game_id, reply } => {
                let info = self
                    .lobbies
                    .get(&game_id)
                    .cloned()
                    .ok_or(SupervisorError::LobbyNotFound);
                let _ = reply.send(info);
            }
            SupervisorCommand::RunOperation {
                game_id,
                operation,
                reply,
            } => self.run_operation(game_id, operation, reply),
            SupervisorCommand::GameCompleted { game_id } => {
                match self.lobbies.get_mut(&game_id) {
                    Some(lobby) => {
                        lobby.status = LobbyStatus::Completed;
                        tracing::info!(%game_id, "match completed");
                    }
                    // Normal for matches restored after a restart: the
                    // lobby was ephemeral and did not survive.
                    None => tracing::debug!(%game_id, "completion for match without a lobby"),
                }
            }
            SupervisorCommand::Ready { reply } => {
                let _ = reply.send(());
            }
            SupervisorCommand::Restored { .. } => {
                tracing::warn!("duplicate restore reply ignored");
            }
        }
    }

    fn create_lobby(
        &mut self,
        game_type: GameType,
        host: Player,
    ) -> Result<LobbyMetadata, SupervisorError> {
        if self.registry.get(game_type).is_none() {
            return Err(SupervisorError::UnsupportedGameType(game_type.to_string()));
        }
        let game_id = GameId::random();
        let lobby = LobbyMetadata::new(game_id, game_type, host);
        tracing::info!(%game_id, %game_type, host = %lobby.host_id, "lobby created");
        self.lobbies.insert(game_id, lobby.clone());
        Ok(lobby)
    }

    fn join_lobby(
        &mut self,
        game_id: GameId,
        player: Player,
    ) -> Result<LobbyMetadata, SupervisorError> {
        let lobby = self
            .lobbies
            .get_mut(&game_id)
            .ok_or(SupervisorError::LobbyNotFound)?;
        if !lobby.status.is_joinable() {
            return Err(SupervisorError::NotJoinable);
        }
        if lobby.contains(player.id) {
            return Err(SupervisorError::AlreadyJoined);
        }
        if lobby.players.len() >= lobby.game_type.max_players() {
            return Err(SupervisorError::LobbyFull);
        }

        tracing::info!(%game_id, player = %player.id, "player joined lobby");
        lobby.add_player(player);
        Ok(lobby.clone())
    }

    fn leave_lobby(
        &mut self,
        game_id: GameId,
        player: PlayerId,
    ) -> Result<LobbyLeft, SupervisorError> {
        let lobby = self
            .lobbies
            .get_mut(&game_id)
            .ok_or(SupervisorError::LobbyNotFound)?;

        // A started or finished lobby is never mutated by a leave; the
        // host-membership invariant only holds while it is joinable.
        if !lobby.status.is_joinable() {
            return Ok(LobbyLeft {
                game_id,
                message: "left lobby",
            });
        }

        if player == lobby.host_id {
            lobby.remove_player(player);
            lobby.status = LobbyStatus::Cancelled;
            tracing::info!(%game_id, %player, "host left, lobby cancelled");
            return Ok(LobbyLeft {
                game_id,
                message: "host left",
            });
        }

        lobby.remove_player(player);
        tracing::info!(%game_id, %player, "player left lobby");
        Ok(LobbyLeft {
            game_id,
            message: "left lobby",
        })
    }

    fn start_game(&mut self, game_id: GameId, caller: PlayerId) -> Result<GameId, SupervisorError> {
        let lobby = self
            .lobbies
            .get_mut(&game_id)
            .ok_or(SupervisorError::GameNotFound)?;
        if caller != lobby.host_id || lobby.status != LobbyStatus::ReadyToStart {
            return Err(SupervisorError::NotStartable);
        }
        let module = self
            .registry
            .get(lobby.game_type)
            .ok_or_else(|| SupervisorError::UnsupportedGameType(lobby.game_type.to_string()))?;

        let (handle, initial) = module.create(
            game_id,
            lobby.ordered_players(),
            self.persistence.clone(),
            self.mailbox.clone(),
        )?;

        // Fire-and-forget: a failed initial save is logged but does not
        // stop the match from starting.
        self.persistence.save_detached(game_id, initial);

        lobby.status = LobbyStatus::InProgress;
        self.matches.insert(game_id, (lobby.game_type, handle));
        tracing::info!(%game_id, "game started");
        Ok(game_id)
    }

    /// Forwards an operation to the owning worker. The reply is adapted
    /// into the generic response in a spawned task so the supervisor
    /// never waits on a worker.
    fn run_operation(&mut self, game_id: GameId, operation: GameOperation, reply: Reply<Value>) {
        let Some((_, handle)) = self.matches.get(&game_id) else {
            let _ = reply.send(Err(SupervisorError::MatchNotFound));
            return;
        };
        let handle = handle.clone();
        tokio::spawn(async move {
            let result = match operation {
                GameOperation::MakeMove { player, payload } => {
                    handle.make_move(player, payload).await
                }
                GameOperation::GetState => handle.state().await,
            };
            let _ = reply.send(result);
        });
    }
}

/// Sends an error reply for a rejected command, whatever its shape.
fn reject(cmd: SupervisorCommand, err: impl Fn() -> SupervisorError) {
    match cmd {
        SupervisorCommand::CreateLobby { reply, .. } => {
            let _ = reply.send(Err(err()));
        }
        SupervisorCommand::JoinLobby { reply, .. } => {
            let _ = reply.send(Err(err()));
        }
        SupervisorCommand::LeaveLobby { reply, .. } => {
            let _ = reply.send(Err(err()));
        }
        SupervisorCommand::StartGame { reply, .. } => {
            let _ = reply.send(Err(err()));
        }
        SupervisorCommand::ListLobbies { reply } => {
            let _ = reply.send(Err(err()));
        }
        SupervisorCommand::LobbyInfo { reply, .. } => {
            let _ = reply.send(Err(err()));
        }
        SupervisorCommand::RunOperation { reply, .. } => {
            let _ = reply.send(Err(err()));
        }
        // No reply channel to fail; dropping the Ready reply already
        // signals the caller.
        SupervisorCommand::GameCompleted { .. }
        | SupervisorCommand::Ready { .. }
        | SupervisorCommand::Restored { .. } => {}
    }
}

/// Spawns the supervisor and its restore task, returning the handle.
///
/// The supervisor starts Initializing; commands sent before the restore
/// completes are buffered and drained in arrival order. Await
/// [`SupervisorHandle::ready`] to block until it is Running.
pub fn spawn_supervisor(
    registry: Arc<ModuleRegistry>,
    persistence: PersistenceHandle,
) -> SupervisorHandle {
    let (tx, rx) = mpsc::channel(CHANNEL_SIZE);

    // The restore runs outside the supervisor task so the mailbox can
    // fill (and stash) while the I/O is in flight.
    let restore_tx = tx.clone();
    let restore_persistence = persistence.clone();
    tokio::spawn(async move {
        let result = restore_persistence.load_all().await;
        if restore_tx
            .send(SupervisorCommand::Restored { result })
            .await
            .is_err()
        {
            tracing::error!("supervisor gone before restore completed");
        }
    });

    let supervisor = Supervisor {
        lobbies: HashMap::new(),
        matches: HashMap::new(),
        registry,
        persistence,
        mailbox: SupervisorMailbox { sender: tx.clone() },
        receiver: rx,
        stash: VecDeque::new(),
        restoring: true,
    };
    tokio::spawn(supervisor.run());

    SupervisorHandle { sender: tx }
}
