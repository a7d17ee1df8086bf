//! Game rules for the parlor backend.
//!
//! Three things live here, all pure (no I/O, no tasks):
//!
//! - the [`GameModel`] trait, the contract every set of game rules
//!   implements so the kernel can host it;
//! - the concrete models (currently [`tictactoe`]);
//! - the snapshot codec, the single place the storage payload format
//!   lives ([`encode_snapshot`] / [`decode_snapshot`]).
//!
//! The unions ([`MovePayload`], [`Snapshot`]) are closed enums over the
//! registered game types. The orchestration layers never branch on them;
//! only this crate and the per-game module bundles do.

mod model;
mod snapshot;
pub mod tictactoe;

pub use model::{GameModel, MatchStatus, MovePayload};
pub use snapshot::{decode_snapshot, encode_snapshot, CodecError, Snapshot};
