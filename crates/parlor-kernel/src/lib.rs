//! Game orchestration kernel.
//!
//! Three kinds of cooperative workers, each an isolated Tokio task with
//! a bounded mailbox:
//!
//! - one [`MatchWorker`](match_worker) per live match, owning that
//!   match's state and sequencing its moves;
//! - the persistence worker (from `parlor-store`), owning all I/O;
//! - the [`Supervisor`](supervisor), owning the lobby table and the
//!   live-match index, and routing game operations to workers.
//!
//! Game types plug in through the [`GameModule`] bundle and the
//! [`ModuleRegistry`]; the supervisor contains zero game-type branches.

mod error;
mod match_worker;
mod module;
mod op;
mod supervisor;

pub use error::SupervisorError;
pub use match_worker::{restore_match, spawn_match, MatchHandle};
pub use module::{GameModule, ModuleRegistry};
pub use op::GameOperation;
pub use supervisor::{spawn_supervisor, LobbyLeft, SupervisorHandle, SupervisorMailbox};
