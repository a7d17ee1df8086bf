//! Durable snapshot storage.
//!
//! Two layers: [`GameRepository`] talks SQL, and the persistence actor
//! ([`spawn_persistence`] / [`PersistenceHandle`]) serializes every
//! repository call behind a request/reply mailbox so no other task ever
//! blocks on I/O or holds the database handle.

mod error;
mod repository;
mod worker;

pub use error::StorageError;
pub use repository::GameRepository;
pub use worker::{spawn_persistence, PersistenceHandle};
