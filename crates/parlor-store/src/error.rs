//! Error types for the storage layer.

use parlor_games::CodecError;

/// Errors from the snapshot store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The database rejected a connection, statement, or transaction.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The snapshot codec failed while writing.
    ///
    /// Read-side decode failures never surface here; a row that does
    /// not decode is skipped or treated as absent, by contract.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The persistence worker's mailbox is closed.
    #[error("persistence worker unavailable")]
    WorkerUnavailable,
}
