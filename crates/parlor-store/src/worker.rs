//! The persistence actor.
//!
//! An isolated Tokio task that owns the [`GameRepository`] and processes
//! its mailbox strictly sequentially, so all database I/O happens in one
//! place and callers never block on it themselves. Every outcome,
//! success or failure, travels back on the command's reply channel;
//! nothing here can crash the worker.

use std::collections::HashMap;

use tokio::sync::{mpsc, oneshot};

use parlor_core::{GameId, GameType};
use parlor_games::Snapshot;

use crate::{GameRepository, StorageError};

/// Mailbox capacity for the persistence worker.
const CHANNEL_SIZE: usize = 64;

/// Commands understood by the persistence worker.
enum PersistenceCommand {
    Load {
        game_id: GameId,
        game_type: GameType,
        reply: oneshot::Sender<Result<Option<Snapshot>, StorageError>>,
    },
    Save {
        game_id: GameId,
        snapshot: Snapshot,
        reply: oneshot::Sender<Result<(), StorageError>>,
    },
    LoadAll {
        reply: oneshot::Sender<Result<HashMap<GameId, (GameType, Snapshot)>, StorageError>>,
    },
}

/// Handle to the persistence worker. Cheap to clone.
#[derive(Clone)]
pub struct PersistenceHandle {
    sender: mpsc::Sender<PersistenceCommand>,
}

impl PersistenceHandle {
    /// Loads one snapshot, expecting the given game type.
    pub async fn load(
        &self,
        game_id: GameId,
        game_type: GameType,
    ) -> Result<Option<Snapshot>, StorageError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(PersistenceCommand::Load {
                game_id,
                game_type,
                reply: reply_tx,
            })
            .await
            .map_err(|_| StorageError::WorkerUnavailable)?;
        reply_rx.await.map_err(|_| StorageError::WorkerUnavailable)?
    }

    /// Saves one snapshot and waits for the outcome.
    pub async fn save(&self, game_id: GameId, snapshot: Snapshot) -> Result<(), StorageError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(PersistenceCommand::Save {
                game_id,
                snapshot,
                reply: reply_tx,
            })
            .await
            .map_err(|_| StorageError::WorkerUnavailable)?;
        reply_rx.await.map_err(|_| StorageError::WorkerUnavailable)?
    }

    /// Saves one snapshot without waiting. The outcome is observed by a
    /// spawned task and logged; a failed save never fails the caller.
    pub fn save_detached(&self, game_id: GameId, snapshot: Snapshot) {
        let handle = self.clone();
        tokio::spawn(async move {
            match handle.save(game_id, snapshot).await {
                Ok(()) => tracing::debug!(%game_id, "snapshot saved"),
                Err(e) => tracing::error!(%game_id, error = %e, "snapshot save failed"),
            }
        });
    }

    /// Loads every well-formed snapshot row.
    pub async fn load_all(&self) -> Result<HashMap<GameId, (GameType, Snapshot)>, StorageError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(PersistenceCommand::LoadAll { reply: reply_tx })
            .await
            .map_err(|_| StorageError::WorkerUnavailable)?;
        reply_rx.await.map_err(|_| StorageError::WorkerUnavailable)?
    }
}

/// Spawns the persistence worker task and returns a handle to it.
pub fn spawn_persistence(repository: GameRepository) -> PersistenceHandle {
    let (tx, mut rx) = mpsc::channel(CHANNEL_SIZE);

    tokio::spawn(async move {
        tracing::info!("persistence worker started");
        while let Some(cmd) = rx.recv().await {
            match cmd {
                PersistenceCommand::Load {
                    game_id,
                    game_type,
                    reply,
                } => {
                    let result = repository.load(game_id, game_type).await;
                    let _ = reply.send(result);
                }
                PersistenceCommand::Save {
                    game_id,
                    snapshot,
                    reply,
                } => {
                    let result = repository.save(game_id, &snapshot).await;
                    let _ = reply.send(result);
                }
                PersistenceCommand::LoadAll { reply } => {
                    let result = repository.load_all().await;
                    let _ = reply.send(result);
                }
            }
        }
        tracing::info!("persistence worker stopped");
    });

    PersistenceHandle { sender: tx }
}
