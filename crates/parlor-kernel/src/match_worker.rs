//! Match worker: an isolated Tokio task that owns one live match.
//!
//! Each worker runs in its own task, communicating with the outside
//! world through an mpsc channel: no shared mutable state, just message
//! passing. The worker is the only writer of its match's state; every
//! move is validated and applied strictly in arrival order.
//!
//! Durability deliberately trails acknowledgement: an accepted move is
//! answered immediately and the snapshot save is fired off to the
//! persistence worker without waiting. Saves are upserts, so a duplicate
//! or late save of the same state is harmless.

use serde_json::Value;
use tokio::sync::{mpsc, oneshot};

use parlor_core::{GameError, GameId, Player, PlayerId};
use parlor_games::{GameModel, MovePayload, Snapshot};
use parlor_store::PersistenceHandle;

use crate::supervisor::SupervisorMailbox;
use crate::SupervisorError;

/// Mailbox capacity for each match worker.
const CHANNEL_SIZE: usize = 32;

/// Commands sent to a match worker through its channel.
pub(crate) enum MatchCommand {
    /// Apply a move for a player. Replies with the updated state view,
    /// or the reason the move was rejected.
    MakeMove {
        player: PlayerId,
        payload: MovePayload,
        reply: oneshot::Sender<Result<Value, GameError>>,
    },

    /// Request the current state view. Always succeeds.
    GetState { reply: oneshot::Sender<Value> },
}

/// Handle to a running match worker. Cheap to clone; the supervisor
/// holds one per live match.
#[derive(Clone)]
pub struct MatchHandle {
    game_id: GameId,
    sender: mpsc::Sender<MatchCommand>,
}

impl MatchHandle {
    /// The id of the match this handle points at.
    pub fn game_id(&self) -> GameId {
        self.game_id
    }

    /// Submits a move and waits for the worker's verdict.
    ///
    /// Game-model rejections come back as [`SupervisorError::Game`]; a
    /// dead worker or dropped reply surfaces as `Unexpected`.
    pub async fn make_move(
        &self,
        player: PlayerId,
        payload: MovePayload,
    ) -> Result<Value, SupervisorError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(MatchCommand::MakeMove {
                player,
                payload,
                reply: reply_tx,
            })
            .await
            .map_err(|_| SupervisorError::Unexpected)?;
        let verdict = reply_rx.await.map_err(|_| SupervisorError::Unexpected)?;
        verdict.map_err(SupervisorError::Game)
    }

    /// Fetches the current state view.
    pub async fn state(&self) -> Result<Value, SupervisorError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(MatchCommand::GetState { reply: reply_tx })
            .await
            .map_err(|_| SupervisorError::Unexpected)?;
        reply_rx.await.map_err(|_| SupervisorError::Unexpected)
    }
}

/// The worker's internal state. Runs inside a Tokio task.
struct MatchWorker<M: GameModel> {
    game_id: GameId,
    state: M,
    persistence: PersistenceHandle,
    supervisor: SupervisorMailbox,
    receiver: mpsc::Receiver<MatchCommand>,
}

impl<M: GameModel> MatchWorker<M> {
    async fn run(mut self) {
        tracing::info!(game_id = %self.game_id, "match worker started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                MatchCommand::MakeMove {
                    player,
                    payload,
                    reply,
                } => {
                    let result = self.handle_move(player, payload);
                    let _ = reply.send(result);
                }
                MatchCommand::GetState { reply } => {
                    let _ = reply.send(self.state.view());
                }
            }
        }

        tracing::info!(game_id = %self.game_id, "match worker stopped");
    }

    /// Validates and applies one move.
    ///
    /// Rejections leave the state untouched. On success the new state
    /// becomes current, the snapshot save is fired without waiting, and
    /// a terminal transition is reported to the supervisor.
    fn handle_move(&mut self, player: PlayerId, payload: MovePayload) -> Result<Value, GameError> {
        if self.state.status().is_terminal() {
            return Err(GameError::GameOver);
        }
        if !self.state.players().iter().any(|p| p.id == player) {
            return Err(GameError::InvalidPlayer(player));
        }
        if self.state.current_player().id != player {
            return Err(GameError::InvalidTurn);
        }

        let mv = M::extract_move(payload)?;
        let next = self.state.apply(player, &mv)?;

        // Ack leads persistence: the reply goes out now, the save lands
        // whenever the persistence worker gets to it.
        self.persistence.save_detached(self.game_id, next.snapshot());

        let view = next.view();
        let terminal = next.status().is_terminal();
        self.state = next;

        if terminal {
            tracing::info!(game_id = %self.game_id, "match reached terminal state");
            self.supervisor.notify_completed(self.game_id);
        }

        Ok(view)
    }
}

/// Spawns a worker for a fresh match.
///
/// Validates the player count through the model's constructor and
/// returns the handle together with the initial snapshot, which the
/// caller persists.
pub fn spawn_match<M: GameModel>(
    game_id: GameId,
    players: Vec<Player>,
    persistence: PersistenceHandle,
    supervisor: SupervisorMailbox,
) -> Result<(MatchHandle, Snapshot), GameError> {
    let state = M::new_match(players)?;
    let initial = state.snapshot();
    let handle = spawn_worker(game_id, state, persistence, supervisor);
    Ok((handle, initial))
}

/// Spawns a worker for a match restored from a snapshot.
///
/// Returns `None` (with a log) when the snapshot does not belong to
/// this model; the caller treats the match as unavailable.
pub fn restore_match<M: GameModel>(
    game_id: GameId,
    snapshot: Snapshot,
    persistence: PersistenceHandle,
    supervisor: SupervisorMailbox,
) -> Option<MatchHandle> {
    let Some(state) = M::from_snapshot(snapshot) else {
        tracing::error!(
            %game_id,
            game_type = %M::game_type(),
            "snapshot does not match the expected game model"
        );
        return None;
    };
    Some(spawn_worker(game_id, state, persistence, supervisor))
}

fn spawn_worker<M: GameModel>(
    game_id: GameId,
    state: M,
    persistence: PersistenceHandle,
    supervisor: SupervisorMailbox,
) -> MatchHandle {
    let (tx, rx) = mpsc::channel(CHANNEL_SIZE);
    let worker = MatchWorker {
        game_id,
        state,
        persistence,
        supervisor,
        receiver: rx,
    };
    tokio::spawn(worker.run());
    MatchHandle {
        game_id,
        sender: tx,
    }
}
